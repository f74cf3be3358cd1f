use crate::error::{AtmosphereError, Result};
use crate::grid::Grid;
use crate::neighborhood::NeighborhoodOffsets;
use crate::point::AtmospherePoint;

/// One parcel landing on a destination cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contribution {
    /// Distance from the parcel's advected position to the cell, `>= 0`.
    pub distance: f64,
    pub point: AtmospherePoint,
}

/// Counters for one scatter pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScatterStats {
    pub scattered: usize,
    pub dropped: usize,
}

/// Per-cell contribution lists filled by the scatter phase and drained by
/// the gather phase. Cleared at the start of every tick; the buffers are
/// kept so repeated ticks do not reallocate.
#[derive(Clone, Debug)]
pub struct AdvectionAccumulator {
    width: usize,
    height: usize,
    cells: Vec<Vec<Contribution>>,
}

impl AdvectionAccumulator {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AtmosphereError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Vec::new(); width * height],
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn ensure_shape(&self, expected: (usize, usize)) -> Result<()> {
        if self.shape() != expected {
            return Err(AtmosphereError::ShapeMismatch {
                field: "accumulator",
                expected,
                actual: self.shape(),
            });
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Contributions collected for `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the accumulator.
    pub fn contributions(&self, x: usize, y: usize) -> &[Contribution] {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of bounds for {}x{} accumulator",
            self.width,
            self.height
        );
        &self.cells[y * self.width + x]
    }

    /// Spread every source cell over the disk around its advected position.
    ///
    /// A parcel at `(x, y)` moves to `(x + wind.x * max_speed, y + wind.y * max_speed)`
    /// and lands on `floor(position + offset)` for each disk offset. Landing
    /// cells outside the grid are dropped; edges never wrap.
    pub fn scatter(
        &mut self,
        source: &Grid<AtmospherePoint>,
        offsets: &NeighborhoodOffsets,
        max_speed: f64,
    ) -> Result<ScatterStats> {
        self.ensure_shape(source.shape())?;

        let mut stats = ScatterStats::default();
        for (x, y, point) in source.iter_cells() {
            let next_x = x as f64 + point.wind.x * max_speed;
            let next_y = y as f64 + point.wind.y * max_speed;

            for (dx, dy) in offsets.iter() {
                let landing_x = (next_x + dx as f64).floor();
                let landing_y = (next_y + dy as f64).floor();

                let Some(offset) = checked_cell(source, landing_x, landing_y) else {
                    stats.dropped += 1;
                    continue;
                };

                let distance = (next_x - landing_x).hypot(next_y - landing_y);
                self.cells[offset].push(Contribution {
                    distance,
                    point: *point,
                });
                stats.scattered += 1;
            }
        }
        Ok(stats)
    }
}

fn checked_cell(grid: &Grid<AtmospherePoint>, x: f64, y: f64) -> Option<usize> {
    // `as` saturates, so only NaN/inf need filtering before the cast.
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    grid.checked_offset(x as i64, y as i64)
}
