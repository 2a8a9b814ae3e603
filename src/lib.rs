//! wharf — the dependency-resolution core of a package manager for remotes
//! addressed by version-controlled tags.
//!
//! wharf resolves a set of root constraints against a lazy package-metadata
//! provider into a concrete version assignment, using depth-first
//! backtracking with greedy-newest candidate selection. It does not fetch
//! source, build anything, or talk to a registry beyond the narrow
//! [`provider::git`] metadata contract; those concerns live outside this
//! crate.
//!
//! # Modules
//!
//! - [`version`] — `Version` (re-exported `semver::Version`) and the
//!   `VersionSet` algebra.
//! - [`constraint`] — `PackageIdentifier`, `Requirement`, `Constraint`.
//! - [`container`] — `Binding`, `PackageContainer`, `PackageContainerProvider`.
//! - [`assignment`] — `VersionAssignment`, the resolver's working state.
//! - [`resolver`] — the backtracking search itself.
//! - [`delegate`] — observability events.
//! - [`cancel`] — cooperative cancellation and deadlines.
//! - [`provider`] — concrete providers (`fixture`, `git`).
//! - [`manifest`] — `wharf.toml` parsing.
//! - [`lockfile`] — `wharf.lock` serialization.
//! - [`config`] — user configuration.
//! - [`error`] — the error taxonomy.
//!
//! # Example
//!
//! ```no_run
//! use wharf::provider::fixture::FixtureBuilder;
//! use wharf::{resolve, Constraint, ResolveOptions, VersionSet, NoopDelegate};
//!
//! # fn main() -> wharf::Result<()> {
//! let provider = FixtureBuilder::new()
//!     .version("A", "1.0.0", vec![])
//!     .build();
//! let roots = vec![Constraint::versioned(
//!     "A",
//!     VersionSet::range("1.0.0".parse().unwrap(), "2.0.0".parse().unwrap()),
//! )];
//! let mut delegate = NoopDelegate;
//! let assignment = resolve(&roots, &provider, &mut delegate, ResolveOptions::default())?;
//! println!("resolved {} packages", assignment.len());
//! # Ok(())
//! # }
//! ```

pub mod assignment;
pub mod cancel;
pub mod config;
pub mod constraint;
pub mod container;
pub mod delegate;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod provider;
pub mod resolver;
pub mod version;

pub use assignment::{BindOutcome, VersionAssignment};
pub use cancel::{CancellationToken, Deadline};
pub use config::Config;
pub use constraint::{Constraint, PackageIdentifier, Requirement};
pub use container::{Binding, PackageContainer, PackageContainerProvider};
pub use delegate::{CollectingDelegate, Event, LoggingDelegate, NoopDelegate, ResolverDelegate};
pub use error::{Error, Result};
pub use lockfile::{LockedBinding, Lockfile, LOCKFILE_NAME};
pub use manifest::{Manifest, MANIFEST_NAME};
pub use resolver::{resolve, ResolveOptions};
pub use version::{Version, VersionSet};
