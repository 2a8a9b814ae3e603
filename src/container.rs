//! Package container and provider: the lazy, I/O-performing boundary the
//! resolver engine consumes. Everything on the other side of these two
//! traits — git checkouts, HTTP registries, filesystem caches — lives
//! outside the core; see [`crate::provider`] for the two concrete
//! implementations this crate ships (`fixture` and `git`).

use crate::constraint::{Constraint, PackageIdentifier};
use crate::error::{Error, Result};
use crate::version::Version;

/// One resolver decision for a single identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A concrete version was chosen.
    Version(Version),
    /// The resolver decided not to include this package.
    Excluded,
    /// Present in a user-provided working state; no version chosen.
    Unversioned,
}

impl Binding {
    pub fn version(&self) -> Option<&Version> {
        match self {
            Binding::Version(v) => Some(v),
            _ => None,
        }
    }
}

/// Lazy, per-identifier access to a package's available versions and their
/// outgoing constraints.
///
/// Implementations are expected to memoize [`PackageContainer::dependencies`]
/// internally — the engine calls it at most once per version per resolution,
/// but backtracking may revisit a version across branches.
pub trait PackageContainer {
    fn identifier(&self) -> &PackageIdentifier;

    /// Available versions, in strictly descending order (newest first).
    /// Finite: bounded by whatever the remote advertises (tags, releases).
    fn versions(&self) -> Result<Vec<Version>>;

    /// Outgoing constraints of this package at `version`.
    ///
    /// Returns `Error::FetchFailed` if `version` is not among
    /// [`PackageContainer::versions`] or the metadata fetch itself fails;
    /// the engine treats either as "skip this candidate" per spec.
    fn dependencies(&self, version: &Version) -> Result<Vec<Constraint>>;

    /// Outgoing constraints of this package's current *working state* — used
    /// only when a root pins this identifier via `Requirement::Unversioned`
    /// (spec.md §4.4). No version is selected, so there is no `Version` to
    /// key off; the default (no unversioned state available) is empty.
    fn unversioned_dependencies(&self) -> Result<Vec<Constraint>> {
        Ok(Vec::new())
    }
}

/// Maps an identifier to its container, fetching lazily. The only component
/// in this crate permitted to perform I/O.
pub trait PackageContainerProvider {
    /// Fetch (or look up in cache) the container for `id`.
    ///
    /// Returns `Error::UnknownContainer` if `id` cannot be retrieved at all —
    /// this is fatal to the whole resolution, since no alternative container
    /// exists for the same identifier.
    fn get_container(&self, id: &PackageIdentifier) -> Result<Box<dyn PackageContainer>>;
}

/// Convenience: wrap a missing-container lookup in the right error variant.
pub fn unknown_container(id: &PackageIdentifier) -> Error {
    Error::UnknownContainer(id.as_str().to_string())
}
