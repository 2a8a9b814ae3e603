//! Cooperative cancellation and wall-clock deadlines for the resolver.
//!
//! The engine checks [`CancellationToken::is_cancelled`] at the two decision
//! points spec.md §5 names: before fetching a container, and before
//! selecting a version. `Deadline` is a small `Instant`-based timeout helper
//! shared by the git provider's per-fetch timeout and any future caller that
//! wants a wall-clock bound.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cheaply cloneable flag an external caller can flip to abort resolution
/// mid-search. The engine unwinds cleanly and returns `Error::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An optional wall-clock bound on the whole resolution. `None` means no
/// intrinsic timeout, matching spec.md §5 ("the resolver has no intrinsic
/// timeout").
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub fn none() -> Self {
        Deadline {
            started: Instant::now(),
            limit: None,
        }
    }

    pub fn after(limit: Duration) -> Self {
        Deadline {
            started: Instant::now(),
            limit: Some(limit),
        }
    }

    /// `0` seconds means "no timeout", matching `ResolverConfig::resolution_timeout_seconds`.
    pub fn from_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            Deadline::none()
        } else {
            Deadline::after(Duration::from_secs(seconds))
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.limit {
            Some(limit) => self.started.elapsed() > limit,
            None => false,
        }
    }
}
