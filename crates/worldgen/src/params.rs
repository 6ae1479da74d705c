use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Largest supported resolution; 2^12 partitions is already ~16.8M cells.
pub const MAX_RESOLUTION: u32 = 12;

pub const DEFAULT_SEED: u64 = 50;

/// A generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainParams {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// `partitions = 2^resolution`.
    pub resolution: u32,
    /// World-space side length of the whole grid.
    pub terrain_length: f32,
    /// Corner heights are drawn from `[-max_height, max_height]`.
    pub max_height: f32,
    /// Jitter amplitude multiplier applied after every pass.
    pub height_decay_rate: f32,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            resolution: 7,
            terrain_length: 100.0,
            max_height: 10.0,
            height_decay_rate: 0.5,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.resolution > MAX_RESOLUTION {
            return Err(TerrainError::invalid(
                "resolution",
                format!("{} exceeds the maximum of {MAX_RESOLUTION}", self.resolution),
            ));
        }
        validate_max_height(self.max_height)?;
        validate_decay_rate(self.height_decay_rate)?;
        if !self.terrain_length.is_finite() || self.terrain_length <= 0.0 {
            return Err(TerrainError::invalid(
                "terrain_length",
                format!("{} must be finite and positive", self.terrain_length),
            ));
        }
        Ok(())
    }

    pub fn partitions(&self) -> usize {
        1usize << self.resolution
    }

    pub fn cell_size(&self) -> f32 {
        self.terrain_length / self.partitions() as f32
    }
}

pub(crate) fn validate_max_height(max_height: f32) -> Result<(), TerrainError> {
    if !max_height.is_finite() || max_height < 0.0 {
        return Err(TerrainError::invalid(
            "max_height",
            format!("{max_height} must be finite and non-negative"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_decay_rate(rate: f32) -> Result<(), TerrainError> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(TerrainError::invalid(
            "height_decay_rate",
            format!("{rate} must lie in [0, 1]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = TerrainParams::default();
        params.validate().expect("defaults validate");
        assert_eq!(params.partitions(), 128);
        assert!((params.cell_size() - 100.0 / 128.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_bad_values_without_clamping() {
        let base = TerrainParams::default();
        let cases = [
            TerrainParams { max_height: -1.0, ..base },
            TerrainParams { max_height: f32::NAN, ..base },
            TerrainParams { height_decay_rate: -0.1, ..base },
            TerrainParams { height_decay_rate: 1.5, ..base },
            TerrainParams { height_decay_rate: f32::NAN, ..base },
            TerrainParams { terrain_length: 0.0, ..base },
            TerrainParams { resolution: MAX_RESOLUTION + 1, ..base },
        ];
        for params in cases {
            let err = params.validate().expect_err("should reject");
            assert!(matches!(err, TerrainError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn resolution_zero_is_a_single_cell() {
        let params = TerrainParams { resolution: 0, ..TerrainParams::default() };
        params.validate().expect("resolution 0 is allowed");
        assert_eq!(params.partitions(), 1);
    }
}
