//! The constraint model: a package identifier paired with a requirement.

use std::fmt;

use crate::version::VersionSet;

/// An opaque, totally-ordered, hashable handle for a package.
///
/// Canonicalization (e.g. normalizing a git remote URL) is the provider's
/// concern; this type treats two identifiers as equal iff their canonical
/// strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageIdentifier(String);

impl PackageIdentifier {
    pub fn new(s: impl Into<String>) -> Self {
        PackageIdentifier(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PackageIdentifier {
    fn from(s: &str) -> Self {
        PackageIdentifier::new(s)
    }
}

impl From<String> for PackageIdentifier {
    fn from(s: String) -> Self {
        PackageIdentifier::new(s)
    }
}

/// A requirement attached to a constraint: either a concrete version set, or
/// the `unversioned` sentinel meaning "present in working state, no version
/// pinned".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Versioned(VersionSet),
    Unversioned,
}

impl Requirement {
    pub fn is_unversioned(&self) -> bool {
        matches!(self, Requirement::Unversioned)
    }

    /// The `VersionSet` view of this requirement, treating `Unversioned` as
    /// `any` for the purpose of merging (it imposes no version restriction).
    pub fn as_version_set(&self) -> VersionSet {
        match self {
            Requirement::Versioned(vs) => vs.clone(),
            Requirement::Unversioned => VersionSet::Any,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Versioned(vs) => write!(f, "{vs}"),
            Requirement::Unversioned => write!(f, "unversioned"),
        }
    }
}

/// A constraint pairs a package identifier with a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub identifier: PackageIdentifier,
    pub requirement: Requirement,
}

impl Constraint {
    pub fn new(identifier: impl Into<PackageIdentifier>, requirement: Requirement) -> Self {
        Constraint {
            identifier: identifier.into(),
            requirement,
        }
    }

    pub fn versioned(identifier: impl Into<PackageIdentifier>, set: VersionSet) -> Self {
        Constraint::new(identifier, Requirement::Versioned(set))
    }

    pub fn unversioned(identifier: impl Into<PackageIdentifier>) -> Self {
        Constraint::new(identifier, Requirement::Unversioned)
    }
}
