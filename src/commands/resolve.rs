use anyhow::Result;

use wharf::{resolve as run_resolver, Binding, Lockfile, LoggingDelegate, NoopDelegate, ResolveOptions};

use super::Source;

pub fn run(path: Option<String>, verbose: bool, fixture: Option<String>) -> Result<()> {
    let source = Source::load(path.clone(), fixture)?;
    let options = ResolveOptions::default();

    let assignment = if verbose {
        let mut delegate = LoggingDelegate;
        run_resolver(source.roots(), source.provider(), &mut delegate, options)?
    } else {
        let mut delegate = NoopDelegate;
        run_resolver(source.roots(), source.provider(), &mut delegate, options)?
    };

    for (id, binding) in assignment.bindings() {
        match binding {
            Binding::Version(v) => println!("{id} {v}"),
            Binding::Unversioned => println!("{id} (unversioned)"),
            Binding::Excluded => {}
        }
    }

    let lockfile = Lockfile::from_assignment(&assignment);
    let dir = path.unwrap_or_else(|| ".".to_string());
    lockfile.save(std::path::Path::new(&dir).join(wharf::LOCKFILE_NAME))?;

    Ok(())
}
