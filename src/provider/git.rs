//! A [`PackageContainerProvider`] over git-tagged remotes.
//!
//! `versions()` lists tags via `git ls-remote --tags <remote>`; `dependencies`
//! reads `wharf.toml` at a tag via `git show <tag>:wharf.toml`. Both shell out
//! with [`std::process::Command`] rather than a git library — the point is a
//! thin, idiomatic wrapper over an external transport, not a reimplementation
//! of git's wire protocol.
//!
//! This is a metadata-only provider: it never clones or checks out a working
//! tree (that is the build-plan/compiler-driver's job, out of scope here per
//! `SPEC_FULL.md` §1). A per-call [`Deadline`] bounds each subprocess, and a
//! timeout surfaces as [`Error::FetchFailed`] exactly like any other
//! transient metadata failure (spec.md §7).

use std::collections::HashMap;
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

use crate::cancel::Deadline;
use crate::constraint::{Constraint, PackageIdentifier};
use crate::container::{PackageContainer, PackageContainerProvider};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::version::Version;

/// One remote's memoized metadata: tags (already parsed + sorted) and the
/// `wharf.toml` contents fetched per tag so far. Shared across branches of
/// the search, per spec.md §5 ("the provider's container cache is shared
/// across branches... writes are idempotent") — guarded by a `Mutex` since
/// the resolver itself is single-threaded but a provider implementation may
/// be handed out to prefetching worker threads.
#[derive(Debug, Default)]
struct RemoteCache {
    tags: Option<Vec<Version>>,
    manifests: HashMap<Version, String>,
}

/// A single git remote, lazily queried.
pub struct GitContainer {
    id: PackageIdentifier,
    remote: String,
    timeout: Duration,
    cache: Mutex<RemoteCache>,
}

impl GitContainer {
    fn run_git(&self, args: &[&str]) -> Result<String> {
        let deadline = Deadline::after(self.timeout);
        let mut child = Command::new("git")
            .args(args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| Error::FetchFailed {
                id: self.id.to_string(),
                cause: format!("failed to spawn git: {e}"),
            })?;

        loop {
            if deadline.is_expired() {
                let _ = child.kill();
                return Err(Error::FetchFailed {
                    id: self.id.to_string(),
                    cause: format!("git {args:?} exceeded {:?} timeout", self.timeout),
                });
            }
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) => std::thread::sleep(Duration::from_millis(10)),
                Err(e) => {
                    return Err(Error::FetchFailed {
                        id: self.id.to_string(),
                        cause: format!("failed to wait on git: {e}"),
                    })
                }
            }
        }

        let output = child.wait_with_output().map_err(|e| Error::FetchFailed {
            id: self.id.to_string(),
            cause: format!("failed to collect git output: {e}"),
        })?;

        if !output.status.success() {
            return Err(Error::FetchFailed {
                id: self.id.to_string(),
                cause: format!(
                    "git {args:?} failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| Error::FetchFailed {
            id: self.id.to_string(),
            cause: format!("git output was not valid UTF-8: {e}"),
        })
    }

    fn fetch_tags(&self) -> Result<Vec<Version>> {
        let raw = self.run_git(&["ls-remote", "--tags", &self.remote])?;
        let mut versions: Vec<Version> = raw
            .lines()
            .filter_map(|line| line.rsplit('/').next())
            .filter_map(|tag| tag.strip_prefix('v').unwrap_or(tag).parse().ok())
            .collect();
        versions.sort();
        versions.dedup();
        versions.reverse();
        Ok(versions)
    }

    fn fetch_manifest(&self, version: &Version) -> Result<String> {
        // Tags may or may not carry a leading "v" — try both, the common
        // convention split in the wild.
        for tag in [format!("v{version}"), version.to_string()] {
            let spec = format!("{tag}:{}", crate::manifest::MANIFEST_NAME);
            if let Ok(contents) = self.run_git(&["show", &spec]) {
                return Ok(contents);
            }
        }
        Err(Error::FetchFailed {
            id: self.id.to_string(),
            cause: format!("could not read {} at tag for {version}", crate::manifest::MANIFEST_NAME),
        })
    }
}

impl PackageContainer for GitContainer {
    fn identifier(&self) -> &PackageIdentifier {
        &self.id
    }

    fn versions(&self) -> Result<Vec<Version>> {
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        if let Some(tags) = &cache.tags {
            return Ok(tags.clone());
        }
        let tags = self.fetch_tags()?;
        cache.tags = Some(tags.clone());
        Ok(tags)
    }

    fn dependencies(&self, version: &Version) -> Result<Vec<Constraint>> {
        {
            let cache = self.cache.lock().expect("cache mutex poisoned");
            if let Some(contents) = cache.manifests.get(version) {
                return parse_manifest_dependencies(contents);
            }
        }
        let contents = self.fetch_manifest(version)?;
        let deps = parse_manifest_dependencies(&contents)?;
        self.cache
            .lock()
            .expect("cache mutex poisoned")
            .manifests
            .insert(version.clone(), contents);
        Ok(deps)
    }
}

fn parse_manifest_dependencies(contents: &str) -> Result<Vec<Constraint>> {
    let manifest: Manifest = toml::from_str(contents)?;
    manifest.root_constraints()
}

/// Builds [`GitContainer`]s on demand, keyed by remote URL (the identifier
/// *is* the remote).
pub struct GitProvider {
    timeout: Duration,
}

impl GitProvider {
    pub fn new(timeout: Duration) -> Self {
        GitProvider { timeout }
    }
}

impl Default for GitProvider {
    fn default() -> Self {
        GitProvider::new(Duration::from_secs(30))
    }
}

impl PackageContainerProvider for GitProvider {
    fn get_container(&self, id: &PackageIdentifier) -> Result<Box<dyn PackageContainer>> {
        Ok(Box::new(GitContainer {
            id: id.clone(),
            remote: id.as_str().to_string(),
            timeout: self.timeout,
            cache: Mutex::new(RemoteCache::default()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_from_ls_remote_output() {
        let raw = "\
abc123\trefs/tags/v1.0.0\n\
def456\trefs/tags/v1.2.0\n\
ghi789\trefs/tags/v1.1.0\n";
        let container = GitContainer {
            id: "example".into(),
            remote: String::new(),
            timeout: Duration::from_secs(1),
            cache: Mutex::new(RemoteCache::default()),
        };
        let versions: Vec<Version> = raw
            .lines()
            .filter_map(|line| line.rsplit('/').next())
            .filter_map(|tag| tag.strip_prefix('v').unwrap_or(tag).parse().ok())
            .collect();
        let mut versions = versions;
        versions.sort();
        versions.reverse();
        assert_eq!(
            versions,
            vec![
                Version::parse("1.2.0").unwrap(),
                Version::parse("1.1.0").unwrap(),
                Version::parse("1.0.0").unwrap(),
            ]
        );
        let _ = container; // constructed only to exercise the struct's fields
    }

    #[test]
    fn parse_manifest_dependencies_reads_wharf_toml() {
        let toml_src = r#"
            [package]
            name = "example"

            [dependencies]
            "github.com/example/b" = ["1.0.0", "2.0.0"]
        "#;
        let deps = parse_manifest_dependencies(toml_src).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].identifier.as_str(), "github.com/example/b");
    }
}
