use log::info;

use crate::diamond_square::{DiamondSquare, NoopObserver, RefinementObserver};
use crate::error::TerrainError;
use crate::grid::{HeightBounds, HeightGrid};
use crate::mesh::{MeshBuilder, MeshData};
use crate::params::TerrainParams;
use crate::query::TerrainQuery;
use crate::rng::{DetRng, RandomSource};

/// A finished, immutable heightmap together with the request that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    params: TerrainParams,
    grid: HeightGrid,
    bounds: HeightBounds,
}

impl Terrain {
    pub fn generate(params: &TerrainParams) -> Result<Self, TerrainError> {
        let mut rng = DetRng::from_seed(params.seed);
        Self::generate_with(params, &mut rng)
    }

    /// Generates from an already-seeded source; `params.seed` is recorded but
    /// not applied.
    pub fn generate_with<R>(params: &TerrainParams, rng: &mut R) -> Result<Self, TerrainError>
    where
        R: RandomSource + ?Sized,
    {
        Self::generate_observed(params, rng, &mut NoopObserver)
    }

    pub fn generate_observed<R, O>(
        params: &TerrainParams,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<Self, TerrainError>
    where
        R: RandomSource + ?Sized,
        O: RefinementObserver + ?Sized,
    {
        let generator = DiamondSquare::from_params(params)?;
        let grid = generator.generate_observed(rng, observer);
        let bounds = grid.scan_min_max();
        info!(
            "terrain generated seed={:#x} resolution={} cells={} min={:.3} max={:.3}",
            params.seed,
            params.resolution,
            grid.len(),
            bounds.min,
            bounds.max
        );
        Ok(Self {
            params: *params,
            grid,
            bounds,
        })
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    pub fn mesh(&self) -> MeshData {
        MeshBuilder::new(self.params.cell_size()).build(&self.grid)
    }
}

impl TerrainQuery for Terrain {
    fn cell_height(&self, row: usize, column: usize) -> f32 {
        self.grid.at(row, column)
    }

    fn partitions(&self) -> usize {
        self.grid.partitions()
    }

    fn cell_size(&self) -> f32 {
        self.params.cell_size()
    }

    fn bounds(&self) -> HeightBounds {
        self.bounds
    }
}
