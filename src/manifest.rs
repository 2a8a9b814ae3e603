//! Parsing a project's `wharf.toml` into root [`Constraint`]s.
//!
//! The manifest only has one job: describe what the resolver should pin at
//! the roots. Dependency values reuse the same requirement grammar the JSON
//! test-fixture format uses (`"any"`, `"empty"`, `["x"]`, `["lo","hi"]`),
//! plus a `{ path = "..." }` table for an unversioned pin — closed over the
//! same four-case algebra the rest of this crate uses instead of free-form
//! semver range strings.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, Requirement};
use crate::error::{Error, Result};
use crate::version::{Version, VersionSet};

pub const MANIFEST_NAME: &str = "wharf.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Named(String),
    Bounds(Vec<String>),
    Path { path: String },
}

impl DependencySpec {
    pub fn to_requirement(&self) -> Result<Requirement> {
        match self {
            DependencySpec::Path { .. } => Ok(Requirement::Unversioned),
            DependencySpec::Named(s) => match s.as_str() {
                "any" => Ok(Requirement::Versioned(VersionSet::any())),
                "empty" => Ok(Requirement::Versioned(VersionSet::empty())),
                other => Err(Error::InvalidManifest(format!(
                    "unrecognized dependency requirement '{other}'"
                ))),
            },
            DependencySpec::Bounds(bounds) => match bounds.as_slice() {
                [exact] => Ok(Requirement::Versioned(VersionSet::exact(
                    parse_version(exact)?,
                ))),
                [lo, hi] => Ok(Requirement::Versioned(VersionSet::range(
                    parse_version(lo)?,
                    parse_version(hi)?,
                ))),
                other => Err(Error::InvalidManifest(format!(
                    "dependency requirement bounds must have 1 or 2 entries, got {}",
                    other.len()
                ))),
            },
        }
    }
}

fn parse_version(s: &str) -> Result<Version> {
    Version::parse(s).map_err(Error::SemVer)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// `wharf.toml`: the project's own identity plus the root dependency set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub package: PackageMeta,

    /// Keyed by package identifier (a canonical string, typically a git
    /// remote URL). `BTreeMap` so iteration order — and therefore the order
    /// root constraints are built in — is identifier-sorted, not
    /// hashmap-random (spec.md §5's determinism requirement starts here).
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
}

impl Manifest {
    pub fn new(name: impl Into<String>) -> Self {
        Manifest {
            package: PackageMeta {
                name: name.into(),
                version: None,
            },
            dependencies: BTreeMap::new(),
        }
    }

    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(MANIFEST_NAME);
        if !path.exists() {
            return Err(Error::InvalidManifest(format!(
                "{MANIFEST_NAME} not found in {}",
                dir.as_ref().display()
            )));
        }
        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let path = dir.as_ref().join(MANIFEST_NAME);
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn exists<P: AsRef<Path>>(dir: P) -> bool {
        dir.as_ref().join(MANIFEST_NAME).exists()
    }

    /// The root constraints the resolver should be invoked with, in
    /// identifier-sorted order.
    pub fn root_constraints(&self) -> Result<Vec<Constraint>> {
        self.dependencies
            .iter()
            .map(|(id, spec)| Ok(Constraint::new(id.clone(), spec.to_requirement()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_versioned_and_path_dependencies() {
        let toml_src = r#"
            [package]
            name = "demo"

            [dependencies]
            "github.com/example/a" = ["1.0.0", "2.0.0"]
            "github.com/example/b" = ["1.5.0"]
            "github.com/example/c" = { path = "../c" }
        "#;
        let manifest: Manifest = toml::from_str(toml_src).unwrap();
        let roots = manifest.root_constraints().unwrap();
        assert_eq!(roots.len(), 3);
        assert!(roots[2].requirement.is_unversioned());
    }

    #[test]
    fn rejects_unknown_named_requirement() {
        let spec = DependencySpec::Named("latest".to_string());
        assert!(spec.to_requirement().is_err());
    }

    #[test]
    fn root_constraints_are_identifier_sorted() {
        let toml_src = r#"
            [package]
            name = "demo"

            [dependencies]
            zebra = "any"
            apple = "any"
        "#;
        let manifest: Manifest = toml::from_str(toml_src).unwrap();
        let roots = manifest.root_constraints().unwrap();
        assert_eq!(roots[0].identifier.as_str(), "apple");
        assert_eq!(roots[1].identifier.as_str(), "zebra");
    }
}
