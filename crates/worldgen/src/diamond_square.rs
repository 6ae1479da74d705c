//! Diamond-Square midpoint displacement over a [`HeightGrid`].
//!
//! Each pass splits every sub-square in two phases. The diamond phase sets
//! every sub-square's center; only then does the square phase set the edge
//! midpoints, because an edge midpoint averages the centers of the
//! sub-squares on both sides of it.

use log::debug;
use smallvec::SmallVec;

use crate::error::TerrainError;
use crate::grid::HeightGrid;
use crate::params::{validate_decay_rate, validate_max_height, TerrainParams, MAX_RESOLUTION};
use crate::rng::RandomSource;

/// Bookkeeping for one refinement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementStep {
    pub pass: u32,
    pub square_size: usize,
    pub squares_per_axis: usize,
    /// Jitter bound for this pass; offsets are drawn from `[-amplitude, amplitude]`.
    pub amplitude: f32,
}

impl RefinementStep {
    fn first(partitions: usize, max_height: f32) -> Self {
        Self {
            pass: 0,
            square_size: partitions,
            squares_per_axis: 1,
            amplitude: max_height,
        }
    }

    fn next(self, decay_rate: f32) -> Self {
        Self {
            pass: self.pass + 1,
            square_size: self.square_size / 2,
            squares_per_axis: self.squares_per_axis * 2,
            amplitude: self.amplitude * decay_rate,
        }
    }

    pub fn half(&self) -> usize {
        self.square_size / 2
    }

    /// Bottom-left corners of every sub-square, row by row.
    pub fn origins(&self) -> impl Iterator<Item = (usize, usize)> {
        let size = self.square_size;
        let count = self.squares_per_axis;
        (0..count).flat_map(move |j| (0..count).map(move |k| (j * size, k * size)))
    }
}

/// What the generator is doing, reported in call order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefinementEvent {
    Corner {
        row: usize,
        column: usize,
        height: f32,
    },
    PassStart(RefinementStep),
    /// A grid read feeding an average.
    Sample { row: usize, column: usize },
    Diamond {
        row: usize,
        column: usize,
        mean: f32,
        height: f32,
    },
    Edge {
        row: usize,
        column: usize,
        mean: f32,
        height: f32,
        samples: usize,
    },
}

pub trait RefinementObserver {
    fn observe(&mut self, event: RefinementEvent);
}

pub struct NoopObserver;

impl RefinementObserver for NoopObserver {
    #[inline]
    fn observe(&mut self, _event: RefinementEvent) {}
}

impl<F: FnMut(RefinementEvent)> RefinementObserver for F {
    fn observe(&mut self, event: RefinementEvent) {
        self(event)
    }
}

type Cell = (usize, usize);

/// One edge of a sub-square: the midpoint to write, the two corners it
/// lies between, and the center of the sub-square across the edge.
struct EdgeMidpoint {
    target: Cell,
    corners: [Cell; 2],
    beyond: (isize, isize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondSquare {
    resolution: u32,
    max_height: f32,
    height_decay_rate: f32,
}

impl DiamondSquare {
    pub fn new(
        resolution: u32,
        max_height: f32,
        height_decay_rate: f32,
    ) -> Result<Self, TerrainError> {
        if resolution > MAX_RESOLUTION {
            return Err(TerrainError::invalid(
                "resolution",
                format!("{resolution} exceeds the maximum of {MAX_RESOLUTION}"),
            ));
        }
        validate_max_height(max_height)?;
        validate_decay_rate(height_decay_rate)?;
        Ok(Self {
            resolution,
            max_height,
            height_decay_rate,
        })
    }

    /// Checks the whole request, including fields the generator ignores.
    pub fn from_params(params: &TerrainParams) -> Result<Self, TerrainError> {
        params.validate()?;
        Ok(Self {
            resolution: params.resolution,
            max_height: params.max_height,
            height_decay_rate: params.height_decay_rate,
        })
    }

    pub fn partitions(&self) -> usize {
        1usize << self.resolution
    }

    /// `log2(partitions)`.
    pub fn passes(&self) -> u32 {
        self.resolution
    }

    /// Amplitude bound of every pass, in order.
    pub fn amplitudes(&self) -> impl Iterator<Item = f32> {
        let decay = self.height_decay_rate;
        std::iter::successors(Some(self.max_height), move |a| Some(a * decay))
            .take(self.passes() as usize)
    }

    pub fn generate<R>(&self, rng: &mut R) -> HeightGrid
    where
        R: RandomSource + ?Sized,
    {
        self.generate_observed(rng, &mut NoopObserver)
    }

    pub fn generate_observed<R, O>(&self, rng: &mut R, observer: &mut O) -> HeightGrid
    where
        R: RandomSource + ?Sized,
        O: RefinementObserver + ?Sized,
    {
        let partitions = self.partitions();
        let mut grid = HeightGrid::zeroed(partitions);

        for (row, column) in grid.corners() {
            let height = rng.range(-self.max_height, self.max_height);
            grid.set_at(row, column, height);
            observer.observe(RefinementEvent::Corner {
                row,
                column,
                height,
            });
        }

        let mut step = RefinementStep::first(partitions, self.max_height);
        for _ in 0..self.passes() {
            debug!(
                "diamond_square pass={} square_size={} squares_per_axis={} amplitude={}",
                step.pass, step.square_size, step.squares_per_axis, step.amplitude
            );
            observer.observe(RefinementEvent::PassStart(step));
            for (row, column) in step.origins() {
                diamond(&mut grid, row, column, &step, rng, observer);
            }
            for (row, column) in step.origins() {
                square(&mut grid, row, column, &step, rng, observer);
            }
            step = step.next(self.height_decay_rate);
        }

        grid
    }
}

fn diamond<R, O>(
    grid: &mut HeightGrid,
    row: usize,
    column: usize,
    step: &RefinementStep,
    rng: &mut R,
    observer: &mut O,
) where
    R: RandomSource + ?Sized,
    O: RefinementObserver + ?Sized,
{
    let size = step.square_size;
    let half = step.half();
    let corners = [
        (row, column),
        (row, column + size),
        (row + size, column),
        (row + size, column + size),
    ];
    let mut sum = 0.0;
    for (r, c) in corners {
        observer.observe(RefinementEvent::Sample { row: r, column: c });
        sum += grid.at(r, c);
    }
    let mean = sum / corners.len() as f32;
    let height = mean + rng.range(-step.amplitude, step.amplitude);
    let (center_row, center_column) = (row + half, column + half);
    grid.set_at(center_row, center_column, height);
    observer.observe(RefinementEvent::Diamond {
        row: center_row,
        column: center_column,
        mean,
        height,
    });
}

fn square<R, O>(
    grid: &mut HeightGrid,
    row: usize,
    column: usize,
    step: &RefinementStep,
    rng: &mut R,
    observer: &mut O,
) where
    R: RandomSource + ?Sized,
    O: RefinementObserver + ?Sized,
{
    let size = step.square_size;
    let half = step.half();
    let center = (row + half, column + half);
    let bottom_left = (row, column);
    let bottom_right = (row, column + size);
    let top_left = (row + size, column);
    let top_right = (row + size, column + size);
    let (r, c, s, h) = (row as isize, column as isize, size as isize, half as isize);

    // Bottom and left midpoints are the top and right midpoints of the
    // sub-squares below and to the left; only row 0 and column 0 own theirs.
    let mut edges: SmallVec<[EdgeMidpoint; 4]> = SmallVec::new();
    if row == 0 {
        edges.push(EdgeMidpoint {
            target: (row, column + half),
            corners: [bottom_left, bottom_right],
            beyond: (r - h, c + h),
        });
    }
    if column == 0 {
        edges.push(EdgeMidpoint {
            target: (row + half, column),
            corners: [bottom_left, top_left],
            beyond: (r + h, c - h),
        });
    }
    edges.push(EdgeMidpoint {
        target: (row + size, column + half),
        corners: [top_left, top_right],
        beyond: (r + s + h, c + h),
    });
    edges.push(EdgeMidpoint {
        target: (row + half, column + size),
        corners: [bottom_right, top_right],
        beyond: (r + h, c + s + h),
    });

    for edge in edges {
        let mut samples: SmallVec<[f32; 4]> = SmallVec::new();
        for (sr, sc) in [center, edge.corners[0], edge.corners[1]] {
            observer.observe(RefinementEvent::Sample { row: sr, column: sc });
            samples.push(grid.at(sr, sc));
        }
        if let Some(height) = grid.get(edge.beyond.0, edge.beyond.1) {
            observer.observe(RefinementEvent::Sample {
                row: edge.beyond.0 as usize,
                column: edge.beyond.1 as usize,
            });
            samples.push(height);
        }
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        let height = mean + rng.range(-step.amplitude, step.amplitude);
        let (target_row, target_column) = edge.target;
        grid.set_at(target_row, target_column, height);
        observer.observe(RefinementEvent::Edge {
            row: target_row,
            column: target_column,
            mean,
            height,
            samples: samples.len(),
        });
    }
}
