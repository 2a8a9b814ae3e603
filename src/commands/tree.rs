use std::collections::HashSet;

use anyhow::Result;

use wharf::{
    resolve as run_resolver, Binding, NoopDelegate, PackageContainerProvider, PackageIdentifier,
    ResolveOptions, VersionAssignment,
};

use super::Source;

pub fn run(path: Option<String>, fixture: Option<String>) -> Result<()> {
    let source = Source::load(path, fixture)?;
    let mut delegate = NoopDelegate;
    let assignment = run_resolver(
        source.roots(),
        source.provider(),
        &mut delegate,
        ResolveOptions::default(),
    )?;

    let mut seen = HashSet::new();
    for c in source.roots() {
        print_subtree(&c.identifier, &assignment, source.provider(), 0, &mut seen)?;
    }
    Ok(())
}

fn print_subtree(
    id: &PackageIdentifier,
    assignment: &VersionAssignment,
    provider: &dyn PackageContainerProvider,
    depth: usize,
    seen: &mut HashSet<PackageIdentifier>,
) -> Result<()> {
    let indent = "  ".repeat(depth);
    let binding = match assignment.binding(id) {
        Some(b) => b,
        None => {
            println!("{indent}{id} (unresolved)");
            return Ok(());
        }
    };
    match binding {
        Binding::Version(v) => println!("{indent}{id} {v}"),
        Binding::Unversioned => println!("{indent}{id} (unversioned)"),
        Binding::Excluded => {
            println!("{indent}{id} (excluded)");
            return Ok(());
        }
    }

    // A cycle re-enters an already-printed identifier; stop descending
    // rather than recursing forever.
    if !seen.insert(id.clone()) {
        return Ok(());
    }

    let deps = match binding {
        Binding::Version(v) => provider.get_container(id)?.dependencies(v)?,
        Binding::Unversioned => provider.get_container(id)?.unversioned_dependencies()?,
        Binding::Excluded => Vec::new(),
    };
    for d in deps {
        print_subtree(&d.identifier, assignment, provider, depth + 1, seen)?;
    }
    Ok(())
}
