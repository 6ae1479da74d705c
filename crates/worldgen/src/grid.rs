use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Share of the height span below the suggested waterline.
pub const WATERLINE_FRACTION: f32 = 1.0 / 3.0;

/// Square grid of `(partitions + 1)²` heights in row-major order.
///
/// Rows run along world z and columns along world x, so cell `(row, column)`
/// sits at `(column * cell_size, row * cell_size)` and vertex `i` of the
/// terrain mesh is cell `coords_of(i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    partitions: usize,
    heights: Vec<f32>,
}

impl HeightGrid {
    pub fn new(partitions: usize) -> Result<Self, TerrainError> {
        if !partitions.is_power_of_two() {
            return Err(TerrainError::invalid(
                "partitions",
                format!("{partitions} is not a power of two"),
            ));
        }
        Ok(Self::zeroed(partitions))
    }

    pub(crate) fn zeroed(partitions: usize) -> Self {
        debug_assert!(partitions.is_power_of_two());
        let side = partitions + 1;
        Self {
            partitions,
            heights: vec![0.0; side * side],
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Cells per side.
    pub fn side(&self) -> usize {
        self.partitions + 1
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    pub fn linear_index(&self, row: usize, column: usize) -> usize {
        debug_assert!(
            row <= self.partitions && column <= self.partitions,
            "cell ({row}, {column}) outside grid of {} partitions",
            self.partitions
        );
        row * self.side() + column
    }

    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        debug_assert!(index < self.heights.len());
        (index / self.side(), index % self.side())
    }

    #[inline]
    pub fn at(&self, row: usize, column: usize) -> f32 {
        self.heights[self.linear_index(row, column)]
    }

    #[inline]
    pub fn set_at(&mut self, row: usize, column: usize, value: f32) {
        let index = self.linear_index(row, column);
        self.heights[index] = value;
    }

    /// Height at a signed coordinate, `None` outside `[0, partitions]` on
    /// either axis.
    pub fn get(&self, row: isize, column: isize) -> Option<f32> {
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        if row > self.partitions || column > self.partitions {
            return None;
        }
        Some(self.at(row, column))
    }

    /// Corner cells in seeding order: (0, 0), (0, P), (P, 0), (P, P).
    pub fn corners(&self) -> [(usize, usize); 4] {
        let last = self.partitions;
        [(0, 0), (0, last), (last, 0), (last, last)]
    }

    pub fn scan_min_max(&self) -> HeightBounds {
        let (min, max) = self
            .heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });
        HeightBounds { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightBounds {
    pub min: f32,
    pub max: f32,
}

impl HeightBounds {
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Suggested water surface height, a third of the way up the span.
    pub fn waterline(&self) -> f32 {
        self.min + self.span() * WATERLINE_FRACTION
    }

    pub fn contains(&self, height: f32) -> bool {
        (self.min..=self.max).contains(&height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two() {
        assert!(HeightGrid::new(6).is_err());
        assert!(HeightGrid::new(0).is_err());
        let grid = HeightGrid::new(8).expect("grid");
        assert_eq!(grid.len(), 81);
        assert!(grid.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn linear_index_is_row_major() {
        let grid = HeightGrid::new(4).expect("grid");
        assert_eq!(grid.linear_index(0, 0), 0);
        assert_eq!(grid.linear_index(0, 4), 4);
        assert_eq!(grid.linear_index(1, 0), 5);
        assert_eq!(grid.linear_index(4, 4), 24);
        for index in 0..grid.len() {
            let (row, column) = grid.coords_of(index);
            assert_eq!(grid.linear_index(row, column), index);
        }
    }

    #[test]
    fn signed_lookup_stops_at_the_edge() {
        let mut grid = HeightGrid::new(2).expect("grid");
        grid.set_at(2, 1, 3.5);
        assert_eq!(grid.get(2, 1), Some(3.5));
        assert_eq!(grid.get(-1, 1), None);
        assert_eq!(grid.get(1, -1), None);
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn bounds_cover_every_cell() {
        let mut grid = HeightGrid::new(2).expect("grid");
        grid.set_at(0, 0, -4.0);
        grid.set_at(1, 2, 9.0);
        let bounds = grid.scan_min_max();
        assert_eq!(bounds, HeightBounds { min: -4.0, max: 9.0 });
        assert!(grid.heights().iter().all(|&h| bounds.contains(h)));
        assert!((bounds.waterline() - 0.333_333).abs() < 1e-4);
    }
}
