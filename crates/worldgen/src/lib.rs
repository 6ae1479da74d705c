pub mod config;
pub mod diamond_square;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod params;
pub mod query;
pub mod rng;
pub mod slot;
pub mod terrain;

pub use config::{load_terrain_cfg, ConfigError, TerrainConfig};
pub use diamond_square::{DiamondSquare, RefinementEvent, RefinementObserver, RefinementStep};
pub use error::{QueryError, TerrainError};
pub use grid::{HeightBounds, HeightGrid};
pub use mesh::{MeshBuilder, MeshData};
pub use params::{TerrainParams, MAX_RESOLUTION};
pub use query::{TerrainQuery, Vantage};
pub use rng::{DetRng, RandomSource};
pub use slot::{Regenerator, TerrainSlot};
pub use terrain::Terrain;
