//! Top-level configuration: the harness's world section plus the decision
//! core's section, loaded from one TOML file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use myrmica_core::CoreConfig;

use crate::world::WorldConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub core: CoreConfig,
}

impl AppConfig {
    /// Loads from a TOML file; a missing file silently yields defaults so a
    /// fresh checkout runs without setup.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.core.validate()?;
        Ok(config)
    }
}
