//! The backtracking resolver engine (spec.md §4.4).
//!
//! Depth-first search over a derived tree of version choices: pop the next
//! pending identifier, fetch its container, try each candidate version
//! newest-first, recurse, and backtrack on contradiction. A synthetic
//! `__root__` package carries the caller's root constraints so the whole
//! search is just one more instance of "bind this package, merge its
//! outgoing constraints" — roots need no special-casing beyond seeding the
//! initial pending queue with `__root__`.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

use crate::assignment::{BindOutcome, VersionAssignment};
use crate::cancel::CancellationToken;
use crate::constraint::{Constraint, PackageIdentifier, Requirement};
use crate::container::{Binding, PackageContainer, PackageContainerProvider};
use crate::delegate::ResolverDelegate;
use crate::error::{Error, Result};
use crate::version::{Version, VersionSet};

fn root_id() -> PackageIdentifier {
    PackageIdentifier::new("__root__")
}

fn root_version() -> Version {
    Version::new(0, 0, 0)
}

/// Options threaded through a single `resolve` call.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub cancellation: CancellationToken,
    /// Safety backstop against runaway recursion on a pathological graph;
    /// mirrors `ResolverConfig::max_depth` in `config.rs`. `0` means
    /// unbounded.
    pub max_depth: usize,
}

struct RootContainer {
    id: PackageIdentifier,
    roots: Vec<Constraint>,
}

impl PackageContainer for RootContainer {
    fn identifier(&self) -> &PackageIdentifier {
        &self.id
    }

    fn versions(&self) -> Result<Vec<Version>> {
        Ok(vec![root_version()])
    }

    fn dependencies(&self, version: &Version) -> Result<Vec<Constraint>> {
        if *version == root_version() {
            Ok(self.roots.clone())
        } else {
            Err(Error::FetchFailed {
                id: self.id.to_string(),
                cause: "no such version of the synthetic root package".into(),
            })
        }
    }
}

struct RootProvider<'p> {
    inner: &'p dyn PackageContainerProvider,
    id: PackageIdentifier,
    roots: Vec<Constraint>,
}

impl<'p> PackageContainerProvider for RootProvider<'p> {
    fn get_container(&self, id: &PackageIdentifier) -> Result<Box<dyn PackageContainer>> {
        if *id == self.id {
            Ok(Box::new(RootContainer {
                id: self.id.clone(),
                roots: self.roots.clone(),
            }))
        } else {
            self.inner.get_container(id)
        }
    }
}

/// Reject input the search should never even attempt, per spec.md §7
/// (`InvalidInput`) and the Open Question of spec.md §9 (resolved in
/// DESIGN.md: a mix of versioned and unversioned roots on the same
/// identifier is rejected rather than silently preferring one).
fn validate_roots(roots: &[Constraint]) -> Result<()> {
    let mut versioned: BTreeSet<PackageIdentifier> = BTreeSet::new();
    let mut unversioned: BTreeSet<PackageIdentifier> = BTreeSet::new();

    for c in roots {
        match &c.requirement {
            Requirement::Versioned(vs) => {
                if vs.is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "root constraint on '{}' is the empty version set",
                        c.identifier
                    )));
                }
                versioned.insert(c.identifier.clone());
            }
            Requirement::Unversioned => {
                unversioned.insert(c.identifier.clone());
            }
        }
    }

    if let Some(id) = versioned.intersection(&unversioned).next() {
        return Err(Error::InvalidInput(format!(
            "'{id}' is named by both a versioned and an unversioned root constraint"
        )));
    }

    Ok(())
}

struct Search<'p, 'd> {
    provider: &'p dyn PackageContainerProvider,
    delegate: &'d mut dyn ResolverDelegate,
    options: ResolveOptions,
    unversioned: BTreeSet<PackageIdentifier>,
    containers: HashMap<PackageIdentifier, Rc<dyn PackageContainer>>,
    fetched: BTreeSet<PackageIdentifier>,
    failure: Option<Error>,
}

impl<'p, 'd> Search<'p, 'd> {
    fn get_container(&mut self, id: &PackageIdentifier) -> Result<Rc<dyn PackageContainer>> {
        if let Some(c) = self.containers.get(id) {
            return Ok(Rc::clone(c));
        }
        let container: Rc<dyn PackageContainer> = Rc::from(self.provider.get_container(id)?);
        if self.fetched.insert(id.clone()) {
            self.delegate.added(id);
        }
        self.containers.insert(id.clone(), Rc::clone(&container));
        Ok(container)
    }

    fn record_failure(&mut self, id: PackageIdentifier, requirement: VersionSet) {
        if self.failure.is_none() {
            self.failure = Some(Error::UnsatisfiableConstraints {
                id: id.to_string(),
                requirement,
            });
        }
    }

    fn enqueue(
        &self,
        touched: Vec<PackageIdentifier>,
        assignment: &VersionAssignment,
        pending: &mut VecDeque<PackageIdentifier>,
        queued: &mut BTreeSet<PackageIdentifier>,
    ) -> Vec<PackageIdentifier> {
        let mut newly = Vec::new();
        for t in touched {
            if !assignment.is_bound(&t) && queued.insert(t.clone()) {
                pending.push_back(t.clone());
                newly.push(t);
            }
        }
        newly
    }

    fn unwind(
        &self,
        newly: &[PackageIdentifier],
        pending: &mut VecDeque<PackageIdentifier>,
        queued: &mut BTreeSet<PackageIdentifier>,
    ) {
        for _ in 0..newly.len() {
            if let Some(removed) = pending.pop_back() {
                queued.remove(&removed);
            }
        }
    }

    /// Depth-first search over `pending`. On success returns `Ok(true)` with
    /// `pending` drained and `assignment` holding the solution. On failure
    /// returns `Ok(false)` with `pending` and `assignment` restored to
    /// exactly their state on entry.
    fn solve(
        &mut self,
        pending: &mut VecDeque<PackageIdentifier>,
        queued: &mut BTreeSet<PackageIdentifier>,
        assignment: &mut VersionAssignment,
        depth: usize,
    ) -> Result<bool> {
        if self.options.cancellation.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if self.options.max_depth > 0 && depth > self.options.max_depth {
            return Err(Error::Other(format!(
                "resolution exceeded max depth ({})",
                self.options.max_depth
            )));
        }

        let Some(id) = pending.pop_front() else {
            return Ok(true);
        };
        queued.remove(&id);

        // Cyclic graphs: an already-bound identifier is not re-queued by
        // `enqueue`, but it can still reach the front of `pending` if it was
        // queued before it got bound elsewhere. Nothing to do but continue.
        if assignment.is_bound(&id) {
            let ok = self.solve(pending, queued, assignment, depth + 1)?;
            if !ok {
                queued.insert(id.clone());
                pending.push_front(id);
            }
            return Ok(ok);
        }

        if self.unversioned.contains(&id) {
            return self.solve_unversioned(id, pending, queued, assignment, depth);
        }

        if self.options.cancellation.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let container = self.get_container(&id)?;
        let merged = assignment.constraint(&id);
        let candidates: Vec<Version> = container
            .versions()?
            .into_iter()
            .filter(|v| merged.contains(v))
            .collect();

        for v in candidates {
            if self.options.cancellation.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.delegate.trying_version(&id, &v);
            match assignment.bind(container.as_ref(), Binding::Version(v))? {
                BindOutcome::Contradiction(cid) => {
                    self.record_failure(cid, VersionSet::Empty);
                    continue;
                }
                BindOutcome::Bound(touched) => {
                    let newly = self.enqueue(touched, assignment, pending, queued);
                    let ok = self.solve(pending, queued, assignment, depth + 1)?;
                    if ok {
                        return Ok(true);
                    }
                    self.unwind(&newly, pending, queued);
                    assignment.unbind(&id);
                }
            }
        }

        self.delegate.resolution_failed(&id, &merged);
        self.record_failure(id.clone(), merged);
        queued.insert(id.clone());
        pending.push_front(id);
        Ok(false)
    }

    fn solve_unversioned(
        &mut self,
        id: PackageIdentifier,
        pending: &mut VecDeque<PackageIdentifier>,
        queued: &mut BTreeSet<PackageIdentifier>,
        assignment: &mut VersionAssignment,
        depth: usize,
    ) -> Result<bool> {
        let container = self.get_container(&id)?;
        match assignment.bind(container.as_ref(), Binding::Unversioned)? {
            BindOutcome::Contradiction(cid) => {
                self.record_failure(cid, VersionSet::Empty);
                queued.insert(id.clone());
                pending.push_front(id);
                Ok(false)
            }
            BindOutcome::Bound(touched) => {
                let newly = self.enqueue(touched, assignment, pending, queued);
                let ok = self.solve(pending, queued, assignment, depth + 1)?;
                if ok {
                    return Ok(true);
                }
                // Unversioned bindings never backtrack: there is no
                // alternative binding to try for `id`, so this failure
                // propagates straight up.
                self.unwind(&newly, pending, queued);
                assignment.unbind(&id);
                queued.insert(id.clone());
                pending.push_front(id);
                Ok(false)
            }
        }
    }
}

/// Resolve `roots` against `provider`, producing a complete consistent
/// assignment or the most specific failure the search found.
pub fn resolve(
    roots: &[Constraint],
    provider: &dyn PackageContainerProvider,
    delegate: &mut dyn ResolverDelegate,
    options: ResolveOptions,
) -> Result<VersionAssignment> {
    validate_roots(roots)?;

    let root = root_id();
    let root_provider = RootProvider {
        inner: provider,
        id: root.clone(),
        roots: roots.to_vec(),
    };

    let unversioned = roots
        .iter()
        .filter(|c| c.requirement.is_unversioned())
        .map(|c| c.identifier.clone())
        .collect();

    let mut search = Search {
        provider: &root_provider,
        delegate,
        options,
        unversioned,
        containers: HashMap::new(),
        fetched: BTreeSet::new(),
        failure: None,
    };

    let mut pending = VecDeque::new();
    let mut queued = BTreeSet::new();
    pending.push_back(root.clone());
    queued.insert(root.clone());
    let mut assignment = VersionAssignment::new();

    let ok = search.solve(&mut pending, &mut queued, &mut assignment, 0)?;

    if !ok {
        return Err(search
            .failure
            .unwrap_or_else(|| Error::UnsatisfiableConstraints {
                id: "<root>".to_string(),
                requirement: VersionSet::Empty,
            }));
    }

    assignment.unbind(&root);
    Ok(assignment)
}
