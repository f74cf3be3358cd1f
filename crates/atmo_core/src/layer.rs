//! One tick of the atmosphere layer.
//!
//! The update reads the current grid, scatters every cell's state along its
//! wind, gathers the parcels landing on each cell into a weighted average,
//! damps wind over forest and relaxes the result toward the forcing fields.
//! It writes only the caller's next-state grid; swapping buffers is left to
//! the caller.

use serde::Serialize;
use tracing::debug;

use crate::accumulator::AdvectionAccumulator;
use crate::error::Result;
use crate::forcing::{ForcingFields, LandCover};
use crate::grid::Grid;
use crate::neighborhood::NeighborhoodOffsets;
use crate::params::AtmosphereParams;
use crate::point::{blend, AtmospherePoint, Wind};
use crate::weights::{Falloff, WeightNormalizer};

/// Bookkeeping for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    /// Parcel fragments that landed inside the grid.
    pub scattered: usize,
    /// Parcel fragments that left the grid and were discarded.
    pub dropped: usize,
    /// Cells that received no parcel and fell back to the zero point.
    pub empty_cells: usize,
}

#[derive(Clone, Debug)]
pub struct AtmosphereLayer<N = Falloff> {
    params: AtmosphereParams,
    offsets: NeighborhoodOffsets,
    normalizer: N,
}

impl AtmosphereLayer<Falloff> {
    /// Build a layer using the falloff curve named in `params`.
    pub fn new(params: AtmosphereParams) -> Result<Self> {
        let falloff = params.falloff;
        Self::with_normalizer(params, falloff)
    }
}

impl<N: WeightNormalizer> AtmosphereLayer<N> {
    /// Build a layer with a caller-supplied weighting policy; `params.falloff`
    /// is still validated but otherwise ignored.
    pub fn with_normalizer(params: AtmosphereParams, normalizer: N) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            offsets: NeighborhoodOffsets::new(params.radius),
            params,
            normalizer,
        })
    }

    pub fn params(&self) -> &AtmosphereParams {
        &self.params
    }

    pub fn offsets(&self) -> &NeighborhoodOffsets {
        &self.offsets
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// Compute the next state into a freshly allocated grid.
    pub fn update(
        &self,
        current: &Grid<AtmospherePoint>,
        forcing: &ForcingFields,
        land_cover: &Grid<LandCover>,
    ) -> Result<(Grid<AtmospherePoint>, TickStats)> {
        let (width, height) = current.shape();
        let mut scratch = AdvectionAccumulator::new(width, height)?;
        let mut next = Grid::filled(width, height, AtmospherePoint::ZERO)?;
        let stats = self.update_into(current, forcing, land_cover, &mut scratch, &mut next)?;
        Ok((next, stats))
    }

    /// Compute the next state into `next`, reusing `scratch` for the scatter.
    ///
    /// Every shape is checked before anything is written; on error `next`
    /// is left untouched.
    pub fn update_into(
        &self,
        current: &Grid<AtmospherePoint>,
        forcing: &ForcingFields,
        land_cover: &Grid<LandCover>,
        scratch: &mut AdvectionAccumulator,
        next: &mut Grid<AtmospherePoint>,
    ) -> Result<TickStats> {
        let shape = current.shape();
        forcing.ensure_shape(shape)?;
        land_cover.ensure_shape("land cover", shape)?;
        scratch.ensure_shape(shape)?;
        next.ensure_shape("next state", shape)?;

        scratch.clear();
        let scatter = scratch.scatter(current, &self.offsets, self.params.max_speed)?;

        let mut empty_cells = 0;
        let (width, height) = shape;
        for y in 0..height {
            for x in 0..width {
                let contributions = scratch.contributions(x, y);
                if contributions.is_empty() {
                    empty_cells += 1;
                }
                let weighted = self
                    .normalizer
                    .normalize(contributions, AtmospherePoint::ZERO);
                let diffused = blend(&weighted);

                let offset = current.offset(x, y);
                next.as_mut_slice()[offset] = self.relax(
                    diffused,
                    forcing.wind.as_slice()[offset],
                    forcing.temperature.as_slice()[offset],
                    forcing.wetness.as_slice()[offset],
                    land_cover.as_slice()[offset],
                );
            }
        }

        let stats = TickStats {
            scattered: scatter.scattered,
            dropped: scatter.dropped,
            empty_cells,
        };
        debug!(
            scattered = stats.scattered,
            dropped = stats.dropped,
            empty_cells = stats.empty_cells,
            "atmosphere tick"
        );
        Ok(stats)
    }

    /// Damp wind over forest and blend every component toward its forcing.
    fn relax(
        &self,
        diffused: AtmospherePoint,
        wind_forcing: Wind,
        temperature_forcing: f64,
        wetness_forcing: f64,
        cover: LandCover,
    ) -> AtmospherePoint {
        let params = &self.params;
        let wind_multiplier = if cover.is_forest() {
            params.forest_wind_damping
        } else {
            1.0
        };

        let wind = Wind {
            x: (diffused.wind.x * params.wind_retention + wind_forcing.x * params.wind_forcing())
                * wind_multiplier,
            y: (diffused.wind.y * params.wind_retention + wind_forcing.y * params.wind_forcing())
                * wind_multiplier,
        };
        let temperature = diffused.temperature * params.temperature_retention
            + temperature_forcing * params.temperature_forcing();
        let wetness = diffused.wetness * params.wetness_retention
            + wetness_forcing * params.wetness_forcing();

        AtmospherePoint::new(wind, temperature, wetness)
    }
}
