use std::collections::HashSet;

use anyhow::{bail, Result};

use wharf::{
    resolve as run_resolver, Binding, NoopDelegate, PackageContainerProvider, PackageIdentifier,
    ResolveOptions, VersionAssignment,
};

use super::Source;

pub fn run(package: String, path: Option<String>, fixture: Option<String>) -> Result<()> {
    let source = Source::load(path, fixture)?;
    let mut delegate = NoopDelegate;
    let assignment = run_resolver(
        source.roots(),
        source.provider(),
        &mut delegate,
        ResolveOptions::default(),
    )?;

    let target = PackageIdentifier::new(package);
    if assignment.binding(&target).is_none() {
        bail!("'{target}' is not part of the resolved set");
    }

    for root in source.roots() {
        let mut visited = HashSet::new();
        let mut chain = Vec::new();
        if find_path(
            &root.identifier,
            &target,
            &assignment,
            source.provider(),
            &mut visited,
            &mut chain,
        )? {
            let rendered: Vec<String> = chain.iter().map(|id| id.to_string()).collect();
            println!("{}", rendered.join(" -> "));
            return Ok(());
        }
    }

    bail!("no dependency path from any root to '{target}' was found");
}

/// Depth-first search for a path from `current` to `target` along the
/// resolved dependency edges, recording the chain as it descends.
fn find_path(
    current: &PackageIdentifier,
    target: &PackageIdentifier,
    assignment: &VersionAssignment,
    provider: &dyn PackageContainerProvider,
    visited: &mut HashSet<PackageIdentifier>,
    chain: &mut Vec<PackageIdentifier>,
) -> Result<bool> {
    chain.push(current.clone());
    if current == target {
        return Ok(true);
    }
    if !visited.insert(current.clone()) {
        chain.pop();
        return Ok(false);
    }

    let deps = match assignment.binding(current) {
        Some(Binding::Version(v)) => provider.get_container(current)?.dependencies(v)?,
        Some(Binding::Unversioned) => provider.get_container(current)?.unversioned_dependencies()?,
        _ => Vec::new(),
    };
    for d in deps {
        if find_path(&d.identifier, target, assignment, provider, visited, chain)? {
            return Ok(true);
        }
    }

    chain.pop();
    Ok(false)
}
