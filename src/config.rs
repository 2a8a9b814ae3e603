//! User configuration, loaded from `~/.wharf/config.toml`.
//!
//! Trimmed to what the resolution core and its thin CLI actually consume: a
//! resolver section, a git-provider section, and a cache directory — no
//! engine-installation, build, signing, or registry-auth sections, since this
//! crate never fetches source or builds anything.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dependency resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Safety backstop against runaway recursion (default: 100). `0` means
    /// unbounded.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Show the full derivation in conflict errors for debugging.
    #[serde(default)]
    pub verbose_conflicts: bool,
}

fn default_max_depth() -> usize {
    100
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            verbose_conflicts: false,
        }
    }
}

/// `provider::git` settings: the per-fetch timeout, scoped to the provider
/// rather than the engine, since spec.md §5 places any timeout at the
/// provider boundary, not the engine's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitProviderConfig {
    /// Per git subprocess call, 0 = no timeout.
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
}

fn default_fetch_timeout_seconds() -> u64 {
    30
}

impl Default for GitProviderConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: default_fetch_timeout_seconds(),
        }
    }
}

/// On-disk metadata cache directory for providers that want one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub directory: PathBuf,
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("wharf")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: default_cache_dir(),
        }
    }
}

/// User configuration file (`~/.wharf/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub git: GitProviderConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// `$WHARF_CONFIG_DIR/config.toml` if set (useful for tests), otherwise
    /// `~/.wharf/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("WHARF_CONFIG_DIR") {
            return Ok(PathBuf::from(dir).join("config.toml"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("could not locate home directory".to_string()))?;
        Ok(home.join(".wharf").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}
