//! Concrete [`crate::container::PackageContainerProvider`] implementations.
//!
//! `fixture` is the in-memory, JSON-or-builder-backed provider the test
//! suite and the `fixture` CLI subcommand use. `git` is a thin demonstration
//! of the "version-controlled remote" contract the crate's purpose statement
//! names — it shells out to `git` for metadata only, performing no checkout.

pub mod fixture;
pub mod git;
