//! `VersionAssignment`: the partial mapping from container to binding, plus
//! the merged-requirements map it maintains as it grows.
//!
//! Binding and unbinding are the only two operations that mutate this type;
//! `unbind` must exactly reverse the merge `bind` performed, so every `bind`
//! call records an undo frame (the prior value of every merged-constraint
//! entry it touched) rather than trying to "subtract" an intersection, which
//! is not in general invertible.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::constraint::PackageIdentifier;
use crate::container::{Binding, PackageContainer};
use crate::error::{Error, Result};
use crate::version::VersionSet;

/// The result of a [`VersionAssignment::bind`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The binding was recorded; every merged constraint stayed non-empty.
    /// Carries the identifiers referenced by this bind's outgoing
    /// constraints, so the engine knows what to enqueue.
    Bound(Vec<PackageIdentifier>),
    /// Recording the binding drove the named identifier's merged constraint
    /// to `Empty`. The binding has already been rolled back — the
    /// assignment is unchanged.
    Contradiction(PackageIdentifier),
}

#[derive(Debug, Default)]
struct BindFrame {
    /// (identifier, value before this bind touched it) — replayed in reverse
    /// on unbind so repeated touches within one frame unwind correctly.
    previous_constraints: Vec<(PackageIdentifier, Option<VersionSet>)>,
    /// Identifiers that became "referenced" for the first time in this
    /// frame, so unbind can un-reference them.
    newly_referenced: Vec<PackageIdentifier>,
}

/// An ordered mapping from container (by identifier) to binding, plus the
/// derived merged `constraints` map.
///
/// Iteration order over `bindings`/`constraints` is identifier-sorted
/// (`BTreeMap`) — a defined order, per spec, honored everywhere this type is
/// inspected.
#[derive(Debug, Default)]
pub struct VersionAssignment {
    bindings: BTreeMap<PackageIdentifier, Binding>,
    constraints: BTreeMap<PackageIdentifier, VersionSet>,
    /// Identifiers named by some bound package's outgoing constraints —
    /// tracked so `is_valid(Excluded, ...)` can refuse to exclude a package
    /// something else already requires.
    referenced: BTreeSet<PackageIdentifier>,
    frames: HashMap<PackageIdentifier, BindFrame>,
}

impl VersionAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The merged requirement seen so far for `id` (defaults to `any`).
    pub fn constraint(&self, id: &PackageIdentifier) -> VersionSet {
        self.constraints.get(id).cloned().unwrap_or(VersionSet::Any)
    }

    pub fn binding(&self, id: &PackageIdentifier) -> Option<&Binding> {
        self.bindings.get(id)
    }

    pub fn is_bound(&self, id: &PackageIdentifier) -> bool {
        self.bindings.contains_key(id)
    }

    /// `true` iff `binding` is compatible with the currently merged
    /// constraints for `id`.
    pub fn is_valid(&self, id: &PackageIdentifier, binding: &Binding) -> bool {
        match binding {
            Binding::Version(v) => self.constraint(id).contains(v),
            Binding::Excluded => !self.referenced.contains(id),
            Binding::Unversioned => true,
        }
    }

    /// Record `container -> binding`, merging the binding's outgoing
    /// constraints into the running intersection. `Version` bindings merge
    /// `container.dependencies(v)`; `Unversioned` bindings merge
    /// `container.unversioned_dependencies()` (the package's current
    /// working-state deps); `Excluded` contributes nothing.
    ///
    /// On `Contradiction` the assignment is left exactly as it was before
    /// this call — the caller does not need to call `unbind` itself.
    pub fn bind(
        &mut self,
        container: &dyn PackageContainer,
        binding: Binding,
    ) -> Result<BindOutcome> {
        let id = container.identifier().clone();
        self.bindings.insert(id.clone(), binding.clone());

        // A version whose `dependencies` call fails is treated exactly like a
        // version whose constraints turned out to force a contradiction: skip
        // it and let the search try the next candidate, rather than aborting
        // the whole resolution on one unreadable tag.
        let deps = match &binding {
            Binding::Version(v) => match container.dependencies(v) {
                Ok(deps) => deps,
                Err(Error::FetchFailed { .. }) => {
                    self.bindings.remove(&id);
                    return Ok(BindOutcome::Contradiction(id));
                }
                Err(e) => return Err(e),
            },
            Binding::Unversioned => container.unversioned_dependencies()?,
            Binding::Excluded => Vec::new(),
        };

        let mut frame = BindFrame::default();
        let mut contradiction = None;
        let mut touched = Vec::new();

        for c in deps {
            let target = c.identifier.clone();
            let previous = self.constraints.get(&target).cloned();
            frame
                .previous_constraints
                .push((target.clone(), previous.clone()));

            let base = previous.unwrap_or(VersionSet::Any);
            let merged = base.intersect(&c.requirement.as_version_set());

            // Narrowing a constraint on a package that is already bound must
            // also be checked against that package's chosen version — an
            // empty merged set is not the only way to contradict an existing
            // decision.
            let excludes_bound_version = matches!(
                self.bindings.get(&target),
                Some(Binding::Version(bound)) if !merged.contains(bound)
            );
            if (merged.is_empty() || excludes_bound_version) && contradiction.is_none() {
                contradiction = Some(target.clone());
            }
            self.constraints.insert(target.clone(), merged);

            if self.referenced.insert(target.clone()) {
                frame.newly_referenced.push(target.clone());
            }
            touched.push(target);
        }

        self.frames.insert(id.clone(), frame);

        if let Some(cid) = contradiction {
            self.unbind(&id);
            Ok(BindOutcome::Contradiction(cid))
        } else {
            Ok(BindOutcome::Bound(touched))
        }
    }

    /// Reverse a prior `bind` for `id`. A no-op if `id` was never bound.
    pub fn unbind(&mut self, id: &PackageIdentifier) {
        self.bindings.remove(id);
        if let Some(frame) = self.frames.remove(id) {
            for target in frame.newly_referenced {
                self.referenced.remove(&target);
            }
            for (target, previous) in frame.previous_constraints.into_iter().rev() {
                match previous {
                    Some(v) => {
                        self.constraints.insert(target, v);
                    }
                    None => {
                        self.constraints.remove(&target);
                    }
                }
            }
        }
    }

    /// All current bindings, identifier-sorted.
    pub fn bindings(&self) -> impl Iterator<Item = (&PackageIdentifier, &Binding)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, Requirement};
    use crate::version::Version;

    struct FakeContainer {
        id: PackageIdentifier,
        deps: Vec<Constraint>,
    }

    impl PackageContainer for FakeContainer {
        fn identifier(&self) -> &PackageIdentifier {
            &self.id
        }
        fn versions(&self) -> Result<Vec<Version>> {
            Ok(vec![])
        }
        fn dependencies(&self, _version: &Version) -> Result<Vec<Constraint>> {
            Ok(self.deps.clone())
        }
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn bind_merges_outgoing_constraints() {
        let mut a = VersionAssignment::new();
        let c = FakeContainer {
            id: "A".into(),
            deps: vec![Constraint::versioned(
                "B",
                VersionSet::range(v("1.0.0"), v("2.0.0")),
            )],
        };
        let outcome = a.bind(&c, Binding::Version(v("1.0.0"))).unwrap();
        assert_eq!(outcome, BindOutcome::Bound(vec!["B".into()]));
        assert_eq!(
            a.constraint(&"B".into()),
            VersionSet::range(v("1.0.0"), v("2.0.0"))
        );
    }

    #[test]
    fn bind_detects_contradiction_and_rolls_back() {
        let mut a = VersionAssignment::new();
        // First binding narrows B to [1,2).
        let c1 = FakeContainer {
            id: "A".into(),
            deps: vec![Constraint::versioned(
                "B",
                VersionSet::range(v("1.0.0"), v("2.0.0")),
            )],
        };
        a.bind(&c1, Binding::Version(v("1.0.0"))).unwrap();

        // Second binding requires B in a disjoint range: contradiction.
        let c2 = FakeContainer {
            id: "C".into(),
            deps: vec![Constraint::versioned(
                "B",
                VersionSet::range(v("2.0.0"), v("3.0.0")),
            )],
        };
        let outcome = a.bind(&c2, Binding::Version(v("1.0.0"))).unwrap();
        assert_eq!(outcome, BindOutcome::Contradiction("B".into()));

        // C's contribution must have been fully rolled back.
        assert!(!a.is_bound(&"C".into()));
        assert_eq!(
            a.constraint(&"B".into()),
            VersionSet::range(v("1.0.0"), v("2.0.0"))
        );
    }

    #[test]
    fn unbind_restores_prior_state_exactly() {
        let mut a = VersionAssignment::new();
        let c = FakeContainer {
            id: "A".into(),
            deps: vec![Constraint::versioned(
                "B",
                VersionSet::range(v("1.0.0"), v("2.0.0")),
            )],
        };
        a.bind(&c, Binding::Version(v("1.0.0"))).unwrap();
        a.unbind(&"A".into());
        assert!(!a.is_bound(&"A".into()));
        assert!(a.constraint(&"B".into()).is_any());
    }

    #[test]
    fn excluded_invalid_once_referenced() {
        let mut a = VersionAssignment::new();
        let c = FakeContainer {
            id: "A".into(),
            deps: vec![Constraint::versioned("B", VersionSet::any())],
        };
        assert!(a.is_valid(&"B".into(), &Binding::Excluded));
        a.bind(&c, Binding::Version(v("1.0.0"))).unwrap();
        assert!(!a.is_valid(&"B".into(), &Binding::Excluded));
    }

    #[test]
    fn unversioned_requirement_does_not_narrow() {
        let mut a = VersionAssignment::new();
        let c = FakeContainer {
            id: "A".into(),
            deps: vec![Constraint::new("B", Requirement::Unversioned)],
        };
        a.bind(&c, Binding::Version(v("1.0.0"))).unwrap();
        assert!(a.constraint(&"B".into()).is_any());
    }

    #[test]
    fn bind_detects_contradiction_against_already_bound_version() {
        let mut a = VersionAssignment::new();

        // X is bound to 2.0.0 directly, with no narrowing constraint yet.
        let cx = FakeContainer {
            id: "X".into(),
            deps: vec![],
        };
        a.bind(&cx, Binding::Version(v("2.0.0"))).unwrap();
        assert!(a.is_bound(&"X".into()));

        // Y now requires X in [1.0.0, 2.0.0) — a non-empty merged set that
        // nonetheless excludes X's already-chosen 2.0.0.
        let cy = FakeContainer {
            id: "Y".into(),
            deps: vec![Constraint::versioned(
                "X",
                VersionSet::range(v("1.0.0"), v("2.0.0")),
            )],
        };
        let outcome = a.bind(&cy, Binding::Version(v("1.0.0"))).unwrap();
        assert_eq!(outcome, BindOutcome::Contradiction("X".into()));

        // Y's contribution rolled back; X is still bound to 2.0.0.
        assert!(!a.is_bound(&"Y".into()));
        assert_eq!(a.binding(&"X".into()), Some(&Binding::Version(v("2.0.0"))));
    }

    struct FailingContainer {
        id: PackageIdentifier,
    }

    impl PackageContainer for FailingContainer {
        fn identifier(&self) -> &PackageIdentifier {
            &self.id
        }
        fn versions(&self) -> Result<Vec<Version>> {
            Ok(vec![])
        }
        fn dependencies(&self, _version: &Version) -> Result<Vec<Constraint>> {
            Err(Error::FetchFailed {
                id: self.id.to_string(),
                cause: "unreadable manifest".into(),
            })
        }
    }

    #[test]
    fn bind_treats_dependency_fetch_failure_as_contradiction() {
        let mut a = VersionAssignment::new();
        let c = FailingContainer { id: "A".into() };
        let outcome = a.bind(&c, Binding::Version(v("1.0.0"))).unwrap();
        assert_eq!(outcome, BindOutcome::Contradiction("A".into()));
        assert!(!a.is_bound(&"A".into()));
    }
}
