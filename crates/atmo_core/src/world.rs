use crate::accumulator::AdvectionAccumulator;
use crate::error::Result;
use crate::forcing::{ForcingFields, LandCover};
use crate::grid::Grid;
use crate::layer::{AtmosphereLayer, TickStats};
use crate::params::AtmosphereParams;
use crate::point::AtmospherePoint;

/// Double-buffered atmosphere state plus the read-only fields it is forced by.
#[derive(Clone, Debug)]
pub struct AtmosphereWorld {
    pub tick: u64,
    pub seed: u64,
    layer: AtmosphereLayer,
    current: Grid<AtmospherePoint>,
    next: Grid<AtmospherePoint>,
    scratch: AdvectionAccumulator,
    forcing: ForcingFields,
    land_cover: Grid<LandCover>,
}

impl AtmosphereWorld {
    /// Assemble a world, rejecting forcing or land-cover grids whose shape
    /// differs from `initial`.
    pub fn new(
        seed: u64,
        params: AtmosphereParams,
        initial: Grid<AtmospherePoint>,
        forcing: ForcingFields,
        land_cover: Grid<LandCover>,
    ) -> Result<Self> {
        let (width, height) = initial.shape();
        forcing.ensure_shape((width, height))?;
        land_cover.ensure_shape("land cover", (width, height))?;
        Ok(Self {
            tick: 0,
            seed,
            layer: AtmosphereLayer::new(params)?,
            next: Grid::filled(width, height, AtmospherePoint::ZERO)?,
            scratch: AdvectionAccumulator::new(width, height)?,
            current: initial,
            forcing,
            land_cover,
        })
    }

    pub fn width(&self) -> usize {
        self.current.width()
    }

    pub fn height(&self) -> usize {
        self.current.height()
    }

    pub fn current(&self) -> &Grid<AtmospherePoint> {
        &self.current
    }

    pub fn forcing(&self) -> &ForcingFields {
        &self.forcing
    }

    pub fn land_cover(&self) -> &Grid<LandCover> {
        &self.land_cover
    }

    pub fn layer(&self) -> &AtmosphereLayer {
        &self.layer
    }

    /// Compute the next state from the current one, then swap the buffers.
    /// The tick counter is left to the caller.
    pub fn step(&mut self) -> Result<TickStats> {
        let stats = self.layer.update_into(
            &self.current,
            &self.forcing,
            &self.land_cover,
            &mut self.scratch,
            &mut self.next,
        )?;
        std::mem::swap(&mut self.current, &mut self.next);
        Ok(stats)
    }
}
