//! Semantic versions and the `VersionSet` algebra.
//!
//! `Version` is `semver::Version` re-exported as-is: its ordering already
//! implements semver 2.0 precisely the way this crate needs it (numeric
//! comparison of `major.minor.patch`, lexicographic/numeric pre-release
//! comparison, build metadata ignored, no pre-release sorting after any
//! pre-release of the same triple), so there is nothing to reimplement.
//!
//! `VersionSet` is this crate's own arithmetic: a closed, total algebra of
//! four cases over `Version`. It is deliberately not built on a generic
//! interval-set type, because the canonicalization rule in [`VersionSet::range`]
//! (a `[lo, lo.successor)` range is never auto-folded into `Exact`) is
//! specific to this resolver and a generic library would not preserve it.

use std::fmt;

pub use semver::Version;

/// A subset of all valid versions, closed under intersection.
///
/// Four cases:
/// - `Any`: every version.
/// - `Empty`: no version.
/// - `Exact(v)`: only `v`. Used only when literally constructed — a `Range`
///   that happens to admit a single version is *not* simplified to `Exact`.
/// - `Range { lo, hi }`: the half-open interval `[lo, hi)`. Always `lo < hi`;
///   never constructed with `lo >= hi` — callers get `Empty` instead (see
///   [`VersionSet::range`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSet {
    Any,
    Empty,
    Exact(Version),
    Range { lo: Version, hi: Version },
}

impl VersionSet {
    /// Construct `[lo, hi)`, collapsing to `Empty` if the bounds are degenerate.
    ///
    /// This is the one normalization this type performs; it never promotes a
    /// single-version range to `Exact` (see module docs).
    pub fn range(lo: Version, hi: Version) -> Self {
        if lo < hi {
            VersionSet::Range { lo, hi }
        } else {
            VersionSet::Empty
        }
    }

    pub fn exact(v: Version) -> Self {
        VersionSet::Exact(v)
    }

    pub fn any() -> Self {
        VersionSet::Any
    }

    pub fn empty() -> Self {
        VersionSet::Empty
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, VersionSet::Empty)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, VersionSet::Any)
    }

    /// `true` iff `v` is a member of this set.
    pub fn contains(&self, v: &Version) -> bool {
        match self {
            VersionSet::Any => true,
            VersionSet::Empty => false,
            VersionSet::Exact(x) => v == x,
            VersionSet::Range { lo, hi } => lo <= v && v < hi,
        }
    }

    /// The intersection of two sets. Total and closed: always produces one
    /// of the four cases, never a union-only shape.
    pub fn intersect(&self, other: &VersionSet) -> VersionSet {
        use VersionSet::*;
        match (self, other) {
            (Any, x) | (x, Any) => x.clone(),
            (Empty, _) | (_, Empty) => Empty,
            (Exact(x), y) => {
                if y.contains(x) {
                    Exact(x.clone())
                } else {
                    Empty
                }
            }
            (y, Exact(x)) => {
                if y.contains(x) {
                    Exact(x.clone())
                } else {
                    Empty
                }
            }
            (Range { lo: lo1, hi: hi1 }, Range { lo: lo2, hi: hi2 }) => {
                let lo = std::cmp::max(lo1, lo2).clone();
                let hi = std::cmp::min(hi1, hi2).clone();
                VersionSet::range(lo, hi)
            }
        }
    }
}

impl fmt::Display for VersionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSet::Any => write!(f, "any"),
            VersionSet::Empty => write!(f, "empty"),
            VersionSet::Exact(v) => write!(f, "={v}"),
            VersionSet::Range { lo, hi } => write!(f, "[{lo},{hi})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn any_contains_everything() {
        assert!(VersionSet::any().contains(&v("0.0.0")));
        assert!(VersionSet::any().contains(&v("999.999.999")));
    }

    #[test]
    fn empty_contains_nothing() {
        assert!(!VersionSet::empty().contains(&v("1.0.0")));
    }

    #[test]
    fn exact_contains_only_itself() {
        let s = VersionSet::exact(v("1.2.3"));
        assert!(s.contains(&v("1.2.3")));
        assert!(!s.contains(&v("1.2.4")));
    }

    #[test]
    fn range_is_half_open() {
        let s = VersionSet::range(v("1.0.0"), v("2.0.0"));
        assert!(s.contains(&v("1.0.0")));
        assert!(s.contains(&v("1.9.9")));
        assert!(!s.contains(&v("2.0.0")));
    }

    #[test]
    fn range_not_auto_simplified_to_exact() {
        // [1.0.0, 1.0.1) admits exactly one patch version but must remain a
        // Range, not collapse to Exact(1.0.0).
        let lo = v("1.0.0");
        let hi = Version::new(1, 0, 1);
        let s = VersionSet::range(lo.clone(), hi);
        match s {
            VersionSet::Range { .. } => {}
            _ => panic!("range with a single admitted version must stay a Range"),
        }
    }

    #[test]
    fn degenerate_range_collapses_to_empty() {
        let s = VersionSet::range(v("2.0.0"), v("1.0.0"));
        assert!(s.is_empty());
        let s = VersionSet::range(v("1.0.0"), v("1.0.0"));
        assert!(s.is_empty());
    }

    #[test]
    fn intersect_any_is_identity() {
        let s = VersionSet::range(v("1.0.0"), v("2.0.0"));
        assert_eq!(s.intersect(&VersionSet::any()), s);
        assert_eq!(VersionSet::any().intersect(&s), s);
    }

    #[test]
    fn intersect_empty_is_absorbing() {
        let s = VersionSet::range(v("1.0.0"), v("2.0.0"));
        assert!(s.intersect(&VersionSet::empty()).is_empty());
    }

    #[test]
    fn intersect_overlapping_ranges() {
        let a = VersionSet::range(v("1.0.0"), v("2.0.0"));
        let b = VersionSet::range(v("1.5.0"), v("3.0.0"));
        let i = a.intersect(&b);
        assert_eq!(i, VersionSet::range(v("1.5.0"), v("2.0.0")));
    }

    #[test]
    fn intersect_disjoint_ranges_is_empty() {
        let a = VersionSet::range(v("1.0.0"), v("2.0.0"));
        let b = VersionSet::range(v("2.0.0"), v("3.0.0"));
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn intersect_exact_with_range() {
        let a = VersionSet::exact(v("1.5.0"));
        let b = VersionSet::range(v("1.0.0"), v("2.0.0"));
        assert_eq!(a.intersect(&b), VersionSet::exact(v("1.5.0")));

        let c = VersionSet::range(v("2.0.0"), v("3.0.0"));
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn intersect_is_commutative_examples() {
        let sets = [
            VersionSet::any(),
            VersionSet::empty(),
            VersionSet::exact(v("1.0.0")),
            VersionSet::range(v("1.0.0"), v("2.0.0")),
            VersionSet::range(v("1.5.0"), v("3.0.0")),
        ];
        for a in &sets {
            for b in &sets {
                assert_eq!(a.intersect(b), b.intersect(a), "{a} ∩ {b} not commutative");
            }
        }
    }

    #[test]
    fn intersect_is_associative_examples() {
        let sets = [
            VersionSet::any(),
            VersionSet::empty(),
            VersionSet::exact(v("1.0.0")),
            VersionSet::range(v("1.0.0"), v("2.0.0")),
            VersionSet::range(v("1.5.0"), v("3.0.0")),
        ];
        for a in &sets {
            for b in &sets {
                for c in &sets {
                    assert_eq!(
                        a.intersect(b).intersect(c),
                        a.intersect(&b.intersect(c)),
                        "associativity failed for {a}, {b}, {c}"
                    );
                }
            }
        }
    }
}
