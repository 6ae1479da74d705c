use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TerrainError;
use crate::params::TerrainParams;

pub const DEFAULT_CLEARANCE: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainConfig {
    pub terrain: TerrainParams,
    #[serde(default)]
    pub view: ViewCfg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewCfg {
    /// Height kept above the highest peak for the initial viewpoint.
    #[serde(default = "default_clearance")]
    pub clearance: f32,
    /// Fixed water height; the terrain's suggested waterline when absent.
    #[serde(default)]
    pub water_height: Option<f32>,
}

impl Default for ViewCfg {
    fn default() -> Self {
        Self {
            clearance: DEFAULT_CLEARANCE,
            water_height: None,
        }
    }
}

fn default_clearance() -> f32 {
    DEFAULT_CLEARANCE
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read terrain config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse terrain config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] TerrainError),
}

impl TerrainConfig {
    pub fn params(&self) -> Result<TerrainParams, TerrainError> {
        self.terrain.validate()?;
        Ok(self.terrain)
    }
}

pub fn parse_terrain_cfg(raw: &str) -> Result<TerrainConfig, ConfigError> {
    let cfg: TerrainConfig = toml::from_str(raw)?;
    cfg.params()?;
    if cfg.view.clearance < 0.0 {
        warn!(
            "view.clearance={} is negative; the initial viewpoint may start below the peaks",
            cfg.view.clearance
        );
    }
    Ok(cfg)
}

pub fn load_terrain_cfg(path: impl AsRef<Path>) -> Result<TerrainConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let cfg = parse_terrain_cfg(&raw)?;
    info!(
        "terrain config loaded from {} resolution={} seed={:#x}",
        path.display(),
        cfg.terrain.resolution,
        cfg.terrain.seed
    );
    Ok(cfg)
}
