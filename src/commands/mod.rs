//! Thin CLI subcommands. No resolution logic lives here — each command
//! assembles root constraints and a provider, calls into [`wharf::resolve`],
//! and renders the result. One module per subcommand, using
//! `anyhow::Result` at the CLI boundary and leaving the library's own
//! [`wharf::Error`] for everything underneath.

pub mod fixture;
pub mod resolve;
pub mod tree;
pub mod why;

use std::time::Duration;

use anyhow::{Context, Result};

use wharf::provider::fixture::FixtureProvider;
use wharf::provider::git::GitProvider;
use wharf::{Constraint, Manifest, PackageContainerProvider};

/// Where this invocation's root constraints and provider came from: a real
/// project manifest backed by git remotes, or a JSON fixture.
pub enum Source {
    Git {
        roots: Vec<Constraint>,
        provider: GitProvider,
    },
    Fixture {
        roots: Vec<Constraint>,
        provider: FixtureProvider,
    },
}

impl Source {
    pub fn load(path: Option<String>, fixture_path: Option<String>) -> Result<Self> {
        if let Some(fp) = fixture_path {
            let json = std::fs::read_to_string(&fp)
                .with_context(|| format!("reading fixture file '{fp}'"))?;
            let parsed = wharf::provider::fixture::parse(&json)?;
            return Ok(Source::Fixture {
                roots: parsed.roots,
                provider: parsed.provider,
            });
        }

        let dir = path.unwrap_or_else(|| ".".to_string());
        let manifest = Manifest::load(&dir)
            .with_context(|| format!("loading {} from '{dir}'", wharf::MANIFEST_NAME))?;
        let roots = manifest.root_constraints()?;
        let config = wharf::Config::load().unwrap_or_default();
        let provider = GitProvider::new(Duration::from_secs(
            config.git.fetch_timeout_seconds.max(1),
        ));
        Ok(Source::Git { roots, provider })
    }

    pub fn roots(&self) -> &[Constraint] {
        match self {
            Source::Git { roots, .. } => roots,
            Source::Fixture { roots, .. } => roots,
        }
    }

    pub fn provider(&self) -> &dyn PackageContainerProvider {
        match self {
            Source::Git { provider, .. } => provider,
            Source::Fixture { provider, .. } => provider,
        }
    }
}
