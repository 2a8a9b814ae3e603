//! `wharf.lock`: the resolver's output, written so a later `resolve` run can
//! be compared against (or, eventually, skipped in favor of) a prior one.
//!
//! No checksums (there is no tarball to hash — fetching and building are out
//! of scope here) and no timestamp. What remains is exactly what this crate
//! can vouch for: the binding the engine chose for each identifier.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assignment::VersionAssignment;
use crate::container::Binding;
use crate::error::{Error, Result};

pub const LOCKFILE_NAME: &str = "wharf.lock";

/// A single locked binding, in the same `"1.2.3"` / `"unversioned"` encoding
/// the JSON fixture `result` map and `manifest::DependencySpec` both use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LockedBinding(pub String);

impl LockedBinding {
    fn from_binding(binding: &Binding) -> Option<Self> {
        match binding {
            Binding::Version(v) => Some(LockedBinding(v.to_string())),
            Binding::Unversioned => Some(LockedBinding("unversioned".to_string())),
            Binding::Excluded => None,
        }
    }
}

/// The full lockfile: identifier-sorted so `wharf.lock` diffs cleanly in
/// version control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(rename = "package")]
    pub packages: BTreeMap<String, LockedBinding>,
}

impl Lockfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lockfile from a completed resolution. Bindings of
    /// [`Binding::Excluded`] are omitted — there is nothing to lock.
    pub fn from_assignment(assignment: &VersionAssignment) -> Self {
        let packages = assignment
            .bindings()
            .filter_map(|(id, binding)| {
                LockedBinding::from_binding(binding).map(|b| (id.to_string(), b))
            })
            .collect();
        Lockfile { packages }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let lockfile: Lockfile = toml::from_str(&content)
            .map_err(|e| Error::Other(format!("failed to parse {LOCKFILE_NAME}: {e}")))?;
        Ok(Some(lockfile))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("failed to serialize {LOCKFILE_NAME}: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn get(&self, id: &str) -> Option<&LockedBinding> {
        self.packages.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    #[test]
    fn from_assignment_omits_excluded() {
        let mut a = VersionAssignment::new();
        struct Named(crate::constraint::PackageIdentifier);
        impl crate::container::PackageContainer for Named {
            fn identifier(&self) -> &crate::constraint::PackageIdentifier {
                &self.0
            }
            fn versions(&self) -> Result<Vec<Version>> {
                Ok(vec![])
            }
            fn dependencies(&self, _v: &Version) -> Result<Vec<crate::constraint::Constraint>> {
                Ok(vec![])
            }
        }
        let c = Named("A".into());
        a.bind(&c, Binding::Version(Version::parse("1.0.0").unwrap()))
            .unwrap();

        let lock = Lockfile::from_assignment(&a);
        assert_eq!(lock.package_count(), 1);
        assert_eq!(lock.get("A"), Some(&LockedBinding("1.0.0".to_string())));
    }

    #[test]
    fn serializes_as_sorted_toml_table() {
        let mut packages = BTreeMap::new();
        packages.insert("b".to_string(), LockedBinding("1.0.0".to_string()));
        packages.insert("a".to_string(), LockedBinding("2.0.0".to_string()));
        let lock = Lockfile { packages };
        let toml_str = toml::to_string(&lock).unwrap();
        assert!(toml_str.find("a").unwrap() < toml_str.find("b").unwrap());
    }
}
