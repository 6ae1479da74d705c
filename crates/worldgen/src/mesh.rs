use serde::Serialize;

use crate::grid::HeightGrid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Triangulates a finished grid. Vertex `i` is grid cell `i` in row-major
/// order.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuilder {
    cell_size: f32,
}

impl MeshBuilder {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    pub fn build(&self, grid: &HeightGrid) -> MeshData {
        let n = grid.side();
        let partitions = grid.partitions() as f32;
        let mut positions = Vec::with_capacity(n * n);
        let mut uvs = Vec::with_capacity(n * n);
        let mut indices = Vec::with_capacity((n - 1) * (n - 1) * 6);
        for row in 0..n {
            for column in 0..n {
                let x = column as f32 * self.cell_size;
                let z = row as f32 * self.cell_size;
                positions.push([x, grid.at(row, column), z]);
                uvs.push([row as f32 / partitions, column as f32 / partitions]);
            }
        }
        for row in 0..(n - 1) {
            for column in 0..(n - 1) {
                let a = (row * n + column) as u32;
                let b = a + 1;
                let c = a + n as u32;
                let d = c + 1;
                // Counter-clockwise seen from +y.
                indices.extend_from_slice(&[a, c, b, c, d, b]);
            }
        }
        let normals = smooth_normals(&positions, &indices);
        MeshData {
            positions,
            normals,
            uvs,
            indices,
        }
    }
}

fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![[0.0f32; 3]; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = cross(sub(positions[b], positions[a]), sub(positions[c], positions[a]));
        for vertex in [a, b, c] {
            for axis in 0..3 {
                acc[vertex][axis] += face[axis];
            }
        }
    }
    acc.into_iter().map(normalize_or_up).collect()
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(u: [f32; 3], v: [f32; 3]) -> [f32; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn normalize_or_up(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= f32::EPSILON {
        return [0.0, 1.0, 0.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}
