//! Observability events the engine emits. Best-effort and informational —
//! per spec, a delegate must never influence the search.

use crate::constraint::PackageIdentifier;
use crate::version::{Version, VersionSet};

pub trait ResolverDelegate {
    /// A container was fetched from the provider for the first time.
    fn added(&mut self, _id: &PackageIdentifier) {}

    /// The engine is about to tentatively bind `id` to `version`.
    fn trying_version(&mut self, _id: &PackageIdentifier, _version: &Version) {}

    /// No candidate satisfied `requirement` for `id`; the branch backtracks.
    fn resolution_failed(&mut self, _id: &PackageIdentifier, _requirement: &VersionSet) {}
}

/// A delegate that does nothing — the default when the caller doesn't care
/// about progress.
#[derive(Debug, Default)]
pub struct NoopDelegate;

impl ResolverDelegate for NoopDelegate {}

/// Prints progress the way the CLI does elsewhere in this crate: plain
/// `println!`, no logging crate.
#[derive(Debug, Default)]
pub struct LoggingDelegate;

impl ResolverDelegate for LoggingDelegate {
    fn added(&mut self, id: &PackageIdentifier) {
        println!("  + fetching {id}");
    }

    fn trying_version(&mut self, id: &PackageIdentifier, version: &Version) {
        println!("  ? trying {id} {version}");
    }

    fn resolution_failed(&mut self, id: &PackageIdentifier, requirement: &VersionSet) {
        println!("  x no version of {id} satisfies {requirement}");
    }
}

/// Records every event in order, for tests asserting determinism of the
/// event sequence (spec §8).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Event {
    Added(PackageIdentifier),
    TryingVersion(PackageIdentifier, Version),
    ResolutionFailed(PackageIdentifier, VersionSet),
    #[default]
    None,
}

#[derive(Debug, Default)]
pub struct CollectingDelegate {
    pub events: Vec<Event>,
}

impl ResolverDelegate for CollectingDelegate {
    fn added(&mut self, id: &PackageIdentifier) {
        self.events.push(Event::Added(id.clone()));
    }

    fn trying_version(&mut self, id: &PackageIdentifier, version: &Version) {
        self.events
            .push(Event::TryingVersion(id.clone(), version.clone()));
    }

    fn resolution_failed(&mut self, id: &PackageIdentifier, requirement: &VersionSet) {
        self.events
            .push(Event::ResolutionFailed(id.clone(), requirement.clone()));
    }
}
