//! An in-memory [`PackageContainerProvider`] built either from the JSON test
//! fixture format of spec §6 or programmatically via [`FixtureBuilder`] — a
//! small builder for constructing dependency graphs in tests without
//! round-tripping through JSON.
//!
//! JSON shape (see `SPEC_FULL.md` §6):
//! ```json
//! {
//!   "name": "<graph-name>",
//!   "constraints": [ { "identifier": "A", "requirement": ["1.0.0","2.0.0"] } ],
//!   "containers": [
//!     { "identifier": "A",
//!       "versions": { "1.0.0": [ { "identifier": "B", "requirement": "any" } ] },
//!       "unversioned": [] },
//!     ...
//!   ],
//!   "result": { "A": "1.0.0", "B": "1.2.0" }
//! }
//! ```
//! `requirement` accepts `"any"`, `"empty"`, `"unversioned"`, `["x"]` (exact),
//! or `["lo","hi"]` (half-open range) — the last two are the literal grammar
//! of spec §6; `"unversioned"` is this crate's addition so fixtures can
//! exercise scenario 6 (an unversioned root pin).

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::constraint::{Constraint, PackageIdentifier, Requirement};
use crate::container::{Binding, PackageContainer, PackageContainerProvider};
use crate::error::{Error, Result};
use crate::version::{Version, VersionSet};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RequirementJson {
    Named(String),
    Bounds(Vec<String>),
}

fn parse_version(s: &str) -> Result<Version> {
    Version::parse(s).map_err(Error::SemVer)
}

fn requirement_from_json(req: &RequirementJson) -> Result<Requirement> {
    match req {
        RequirementJson::Named(s) => match s.as_str() {
            "any" => Ok(Requirement::Versioned(VersionSet::any())),
            "empty" => Ok(Requirement::Versioned(VersionSet::empty())),
            "unversioned" => Ok(Requirement::Unversioned),
            other => Err(Error::InvalidManifest(format!(
                "unrecognized requirement '{other}'"
            ))),
        },
        RequirementJson::Bounds(bounds) => match bounds.as_slice() {
            [exact] => Ok(Requirement::Versioned(VersionSet::exact(parse_version(
                exact,
            )?))),
            [lo, hi] => Ok(Requirement::Versioned(VersionSet::range(
                parse_version(lo)?,
                parse_version(hi)?,
            ))),
            other => Err(Error::InvalidManifest(format!(
                "requirement bounds must have 1 or 2 entries, got {}",
                other.len()
            ))),
        },
    }
}

#[derive(Debug, Deserialize)]
struct ConstraintJson {
    identifier: String,
    requirement: RequirementJson,
}

#[derive(Debug, Deserialize)]
struct DependencyJson {
    identifier: String,
    requirement: RequirementJson,
}

#[derive(Debug, Deserialize)]
struct ContainerJson {
    identifier: String,
    #[serde(default)]
    versions: BTreeMap<String, Vec<DependencyJson>>,
    #[serde(default)]
    unversioned: Vec<DependencyJson>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[allow(dead_code)]
    name: String,
    constraints: Vec<ConstraintJson>,
    containers: Vec<ContainerJson>,
    result: HashMap<String, String>,
}

/// An expected resolution outcome, as the `result` map of a fixture describes
/// it. `"unversioned"` denotes [`Binding::Unversioned`]; anything else parses
/// as a concrete version.
pub fn expected_binding(s: &str) -> Result<Binding> {
    if s == "unversioned" {
        Ok(Binding::Unversioned)
    } else {
        Ok(Binding::Version(parse_version(s)?))
    }
}

#[derive(Debug, Clone)]
struct ContainerData {
    id: PackageIdentifier,
    versions: BTreeMap<Version, Vec<Constraint>>,
    unversioned: Vec<Constraint>,
}

impl PackageContainer for ContainerData {
    fn identifier(&self) -> &PackageIdentifier {
        &self.id
    }

    fn versions(&self) -> Result<Vec<Version>> {
        Ok(self.versions.keys().rev().cloned().collect())
    }

    fn dependencies(&self, version: &Version) -> Result<Vec<Constraint>> {
        self.versions.get(version).cloned().ok_or_else(|| Error::FetchFailed {
            id: self.id.to_string(),
            cause: format!("no such version {version}"),
        })
    }

    fn unversioned_dependencies(&self) -> Result<Vec<Constraint>> {
        Ok(self.unversioned.clone())
    }
}

/// A provider backed entirely by in-memory data — no I/O, deterministic,
/// cheap to clone into tests.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    containers: HashMap<PackageIdentifier, ContainerData>,
}

impl PackageContainerProvider for FixtureProvider {
    fn get_container(&self, id: &PackageIdentifier) -> Result<Box<dyn PackageContainer>> {
        self.containers
            .get(id)
            .cloned()
            .map(|c| Box::new(c) as Box<dyn PackageContainer>)
            .ok_or_else(|| crate::container::unknown_container(id))
    }
}

/// The parsed form of a fixture file: root constraints, the provider built
/// from its `containers`, and the expected bindings from its `result`.
pub struct Fixture {
    pub roots: Vec<Constraint>,
    pub provider: FixtureProvider,
    pub expected: HashMap<PackageIdentifier, Binding>,
}

/// Parse a fixture in the JSON shape documented on this module.
pub fn parse(json: &str) -> Result<Fixture> {
    let file: FixtureFile = serde_json::from_str(json)?;

    let roots = file
        .constraints
        .into_iter()
        .map(|c| {
            Ok(Constraint::new(
                c.identifier,
                requirement_from_json(&c.requirement)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut containers = HashMap::new();
    for c in file.containers {
        let id = PackageIdentifier::new(c.identifier);
        let mut versions = BTreeMap::new();
        for (ver, deps) in c.versions {
            let v = parse_version(&ver)?;
            let deps = deps
                .into_iter()
                .map(|d| {
                    Ok(Constraint::new(
                        d.identifier,
                        requirement_from_json(&d.requirement)?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            versions.insert(v, deps);
        }
        let unversioned = c
            .unversioned
            .into_iter()
            .map(|d| {
                Ok(Constraint::new(
                    d.identifier,
                    requirement_from_json(&d.requirement)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        containers.insert(
            id.clone(),
            ContainerData {
                id,
                versions,
                unversioned,
            },
        );
    }

    let mut expected = HashMap::new();
    for (id, binding) in file.result {
        expected.insert(PackageIdentifier::new(id), expected_binding(&binding)?);
    }

    Ok(Fixture {
        roots,
        provider: FixtureProvider { containers },
        expected,
    })
}

/// Programmatic builder for fixture graphs, for tests that would rather not
/// round-trip through JSON.
#[derive(Debug, Default)]
pub struct FixtureBuilder {
    containers: HashMap<PackageIdentifier, ContainerData>,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, id: &str) -> &mut ContainerData {
        self.containers
            .entry(PackageIdentifier::new(id))
            .or_insert_with(|| ContainerData {
                id: PackageIdentifier::new(id),
                versions: BTreeMap::new(),
                unversioned: Vec::new(),
            })
    }

    /// Add `id@version` with the given outgoing constraints.
    pub fn version(mut self, id: &str, version: &str, deps: Vec<Constraint>) -> Self {
        let v = parse_version(version).expect("valid version literal in test fixture");
        self.entry(id).versions.insert(v, deps);
        self
    }

    /// Declare `id`'s unversioned working-state dependencies (used only when
    /// a root pins `id` via [`Requirement::Unversioned`]).
    pub fn unversioned(mut self, id: &str, deps: Vec<Constraint>) -> Self {
        self.entry(id).unversioned = deps;
        self
    }

    pub fn build(self) -> FixtureProvider {
        FixtureProvider {
            containers: self.containers,
        }
    }
}
