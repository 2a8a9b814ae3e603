use anyhow::{bail, Result};

use wharf::provider::fixture;
use wharf::{resolve as run_resolver, NoopDelegate, ResolveOptions};

/// Run a JSON test fixture end to end and report whether the resolved
/// bindings match its `result` map.
pub fn run(path: String) -> Result<()> {
    let json = std::fs::read_to_string(&path)?;
    let parsed = fixture::parse(&json)?;

    let mut delegate = NoopDelegate;
    let assignment = match run_resolver(
        &parsed.roots,
        &parsed.provider,
        &mut delegate,
        ResolveOptions::default(),
    ) {
        Ok(a) => a,
        Err(e) => bail!("resolution failed: {e}"),
    };

    let mut mismatches = Vec::new();
    for (id, expected) in &parsed.expected {
        match assignment.binding(id) {
            Some(actual) if actual == expected => {}
            Some(actual) => mismatches.push(format!("{id}: expected {expected:?}, got {actual:?}")),
            None => mismatches.push(format!("{id}: expected {expected:?}, but it was not bound")),
        }
    }

    if mismatches.is_empty() {
        println!("PASS");
        Ok(())
    } else {
        for m in &mismatches {
            eprintln!("{m}");
        }
        bail!("fixture result mismatch ({} of {})", mismatches.len(), parsed.expected.len());
    }
}
