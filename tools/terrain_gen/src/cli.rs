use std::path::PathBuf;

use clap::{ArgAction, Parser};
use worldgen::TerrainParams;

pub const DEFAULT_CONFIG: &str = "assets/terrain/default.toml";
pub const DEFAULT_OUT: &str = "out/terrain";

fn parse_u64(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).map_err(|err| err.to_string())
    } else {
        trimmed.parse::<u64>().map_err(|err| err.to_string())
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "terrain_gen",
    version,
    about = "Diamond-Square terrain generator",
    disable_help_subcommand = true
)]
pub struct Args {
    /// Terrain config to generate from.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
    /// Seed list; every entry is generated as a golden terrain instead.
    #[arg(long)]
    pub seeds: Option<PathBuf>,
    /// Compare against existing golden hashes instead of writing them.
    #[arg(long, action = ArgAction::SetTrue, requires = "seeds")]
    pub check: bool,
    #[arg(long, value_parser = parse_u64)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub resolution: Option<u32>,
    #[arg(long = "max-height")]
    pub max_height: Option<f32>,
    #[arg(long = "decay")]
    pub height_decay_rate: Option<f32>,
    #[arg(long, default_value = DEFAULT_OUT)]
    pub out: PathBuf,
    /// Also dump vertex, normal, UV and index buffers as JSON.
    #[arg(long, action = ArgAction::SetTrue)]
    pub mesh: bool,
    /// Number of regenerations to produce after the initial terrain.
    #[arg(long, default_value_t = 0)]
    pub regenerations: u32,
    /// Terrain name used for output files.
    #[arg(long, default_value = "default")]
    pub name: String,
}

impl Args {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn apply_overrides(&self, mut params: TerrainParams) -> TerrainParams {
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(resolution) = self.resolution {
            params.resolution = resolution;
        }
        if let Some(max_height) = self.max_height {
            params.max_height = max_height;
        }
        if let Some(rate) = self.height_decay_rate {
            params.height_decay_rate = rate;
        }
        params
    }
}
