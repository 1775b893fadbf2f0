use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::naming::{CountingNamer, ResolveOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NamegraphConfig {
    /// Filler of the `default` naming function
    pub filler: Option<char>,
    pub guard_own_namespace: Option<bool>,
    /// Treat a stalled resolution as a failure
    pub strict: Option<bool>,
}

impl NamegraphConfig {
    pub fn filler(&self) -> char {
        self.filler.unwrap_or(CountingNamer::DEFAULT_FILLER)
    }

    pub fn strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        let defaults = ResolveOptions::default();
        ResolveOptions {
            guard_own_namespace: self
                .guard_own_namespace
                .unwrap_or(defaults.guard_own_namespace),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("namegraph.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<NamegraphConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: NamegraphConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &NamegraphConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
