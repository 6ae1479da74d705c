use std::sync::{Arc, PoisonError, RwLock};

use log::info;

use crate::error::TerrainError;
use crate::params::TerrainParams;
use crate::terrain::Terrain;

/// Shared handle to the current terrain.
///
/// Readers hold an `Arc` to whichever terrain was current when they asked;
/// regeneration builds the replacement first and swaps it in afterwards, so
/// a half-built grid is never visible.
pub struct TerrainSlot {
    current: RwLock<Arc<Terrain>>,
}

impl TerrainSlot {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            current: RwLock::new(Arc::new(terrain)),
        }
    }

    pub fn generate(params: &TerrainParams) -> Result<Self, TerrainError> {
        Terrain::generate(params).map(Self::new)
    }

    pub fn current(&self) -> Arc<Terrain> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `terrain` and returns the one it replaced.
    pub fn replace(&self, terrain: Terrain) -> Arc<Terrain> {
        self.install(Arc::new(terrain))
    }

    /// On error the current terrain stays in place.
    pub fn regenerate(&self, params: &TerrainParams) -> Result<Arc<Terrain>, TerrainError> {
        let next = Arc::new(Terrain::generate(params)?);
        self.install(Arc::clone(&next));
        Ok(next)
    }

    fn install(&self, next: Arc<Terrain>) -> Arc<Terrain> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}

/// Seed for the `generation`-th regeneration after the initial terrain.
pub fn regeneration_seed(base_seed: u64, generation: u64) -> u64 {
    if generation == 0 {
        return base_seed;
    }
    wyhash::wyhash(&generation.to_le_bytes(), base_seed)
}

/// Hands out a fresh landscape per regeneration request while staying
/// reproducible from the base seed.
#[derive(Debug, Clone)]
pub struct Regenerator {
    base: TerrainParams,
    generation: u64,
}

impl Regenerator {
    pub fn new(base: TerrainParams) -> Self {
        Self {
            base,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_params(&self) -> TerrainParams {
        TerrainParams {
            seed: regeneration_seed(self.base.seed, self.generation),
            ..self.base
        }
    }

    pub fn advance(&mut self) -> TerrainParams {
        self.generation += 1;
        self.current_params()
    }

    pub fn regenerate(&mut self, slot: &TerrainSlot) -> Result<Arc<Terrain>, TerrainError> {
        let params = self.advance();
        info!(
            "regenerating terrain generation={} seed={:#x}",
            self.generation, params.seed
        );
        slot.regenerate(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TerrainQuery;

    fn params() -> TerrainParams {
        TerrainParams {
            resolution: 3,
            ..TerrainParams::default()
        }
    }

    #[test]
    fn readers_keep_their_snapshot_across_a_swap() {
        let slot = TerrainSlot::generate(&params()).expect("slot");
        let before = slot.current();
        let mut regen = Regenerator::new(params());
        let after = regen.regenerate(&slot).expect("regenerate");
        assert_ne!(before.grid(), after.grid());
        assert_eq!(before.params().seed, params().seed);
        assert!(Arc::ptr_eq(&after, &slot.current()));
        assert_eq!(before.grid().len(), 81);
    }

    #[test]
    fn failed_regeneration_keeps_current_terrain() {
        let slot = TerrainSlot::generate(&params()).expect("slot");
        let before = slot.current();
        let bad = TerrainParams {
            height_decay_rate: -1.0,
            ..params()
        };
        assert!(slot.regenerate(&bad).is_err());
        assert!(Arc::ptr_eq(&before, &slot.current()));
    }

    #[test]
    fn regeneration_seeds_are_reproducible_and_distinct() {
        let mut a = Regenerator::new(params());
        let mut b = Regenerator::new(params());
        assert_eq!(a.current_params(), params());
        let mut seen = vec![params().seed];
        for _ in 0..16 {
            let next = a.advance();
            assert_eq!(next, b.advance());
            assert!(!seen.contains(&next.seed));
            seen.push(next.seed);
        }
        assert_eq!(a.generation(), 16);
    }

    #[test]
    fn concurrent_readers_see_whole_terrains() {
        let slot = Arc::new(TerrainSlot::generate(&params()).expect("slot"));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let terrain = slot.current();
                        assert_eq!(terrain.grid().scan_min_max(), terrain.bounds());
                    }
                })
            })
            .collect();
        let mut regen = Regenerator::new(params());
        for _ in 0..5 {
            regen.regenerate(&slot).expect("regenerate");
        }
        for reader in readers {
            reader.join().expect("reader");
        }
    }
}
