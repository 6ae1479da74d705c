use crate::error::QueryError;
use crate::grid::HeightBounds;

/// Yaw of the initial viewpoint, looking diagonally across the map.
pub const VANTAGE_YAW_DEGREES: f32 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vantage {
    pub position: [f32; 3],
    pub pitch_degrees: f32,
    pub yaw_degrees: f32,
}

/// Read-only view of a frozen terrain for cameras, water surfaces and other
/// consumers.
///
/// Position lookups snap to the nearest grid cell; there is no
/// interpolation. Positions outside the terrain are clamped onto its edge by
/// [`height_at`](TerrainQuery::height_at) and rejected by
/// [`try_height_at`](TerrainQuery::try_height_at).
pub trait TerrainQuery {
    fn cell_height(&self, row: usize, column: usize) -> f32;
    fn partitions(&self) -> usize;
    fn cell_size(&self) -> f32;
    fn bounds(&self) -> HeightBounds;

    fn min_height(&self) -> f32 {
        self.bounds().min
    }

    fn max_height(&self) -> f32 {
        self.bounds().max
    }

    fn side_length(&self) -> f32 {
        self.partitions() as f32 * self.cell_size()
    }

    fn height_at(&self, x: f32, z: f32) -> f32 {
        let column = nearest_cell(x, self.cell_size(), self.partitions());
        let row = nearest_cell(z, self.cell_size(), self.partitions());
        self.cell_height(row, column)
    }

    fn try_height_at(&self, x: f32, z: f32) -> Result<f32, QueryError> {
        let extent = self.side_length();
        let inside = |v: f32| v.is_finite() && (0.0..=extent).contains(&v);
        if !inside(x) || !inside(z) {
            return Err(QueryError::OutOfRange { x, z, extent });
        }
        Ok(self.height_at(x, z))
    }

    /// Ground level with a flat surface (usually water) at `floor`.
    fn surface_at(&self, x: f32, z: f32, floor: f32) -> f32 {
        self.height_at(x, z).max(floor)
    }

    fn waterline(&self) -> f32 {
        self.bounds().waterline()
    }

    /// Viewpoint at the origin corner, `clearance` above both the highest
    /// peak and `floor`, pitched down towards the middle of the map.
    fn vantage(&self, clearance: f32, floor: f32) -> Vantage {
        let y = self.max_height().max(floor) + clearance;
        let pitch = (y / (0.5 * self.side_length())).atan().to_degrees();
        Vantage {
            position: [0.0, y, 0.0],
            pitch_degrees: pitch,
            yaw_degrees: VANTAGE_YAW_DEGREES,
        }
    }
}

/// NaN snaps to cell 0.
fn nearest_cell(coordinate: f32, cell_size: f32, partitions: usize) -> usize {
    let cell = (coordinate / cell_size).round();
    if cell.is_nan() {
        return 0;
    }
    cell.clamp(0.0, partitions as f32) as usize
}
