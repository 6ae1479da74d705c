use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Uniform source of bounded offsets.
///
/// Implementations must be reproducible: after `seed(v)`, the same sequence
/// of `range` calls yields the same values.
pub trait RandomSource {
    fn seed(&mut self, value: u64);

    /// Uniform value in `[low, high)`; returns `low` when the range is empty.
    /// Always consumes exactly one draw.
    fn range(&mut self, low: f32, high: f32) -> f32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn seed(&mut self, value: u64) {
        (**self).seed(value);
    }

    fn range(&mut self, low: f32, high: f32) -> f32 {
        (**self).range(low, high)
    }
}

const UNIT_BITS: u32 = 24;
const UNIT_SCALE: f32 = 1.0 / (1u32 << UNIT_BITS) as f32;

#[derive(Clone)]
pub struct DetRng {
    rng: Xoshiro256PlusPlus,
    draws: u32,
}

impl DetRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Uniform in `[0, 1)` with 24 bits of precision.
    pub fn unit(&mut self) -> f32 {
        self.draws = self.draws.saturating_add(1);
        (self.rng.next_u32() >> (32 - UNIT_BITS)) as f32 * UNIT_SCALE
    }

    pub fn cursor(&self) -> u32 {
        self.draws
    }
}

impl RandomSource for DetRng {
    fn seed(&mut self, value: u64) {
        *self = Self::from_seed(value);
    }

    fn range(&mut self, low: f32, high: f32) -> f32 {
        debug_assert!(low <= high, "range bounds reversed: {low} > {high}");
        let unit = self.unit();
        if low == high {
            return low;
        }
        low + (high - low) * unit
    }
}
