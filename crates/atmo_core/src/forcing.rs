use serde::{Deserialize, Serialize};

use crate::error::{AtmosphereError, Result};
use crate::grid::Grid;
use crate::point::Wind;

/// Surface classification produced by the vegetation generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandCover {
    Desert,
    #[default]
    Grass,
    Forest,
}

impl LandCover {
    pub fn is_forest(self) -> bool {
        matches!(self, LandCover::Forest)
    }
}

/// Baseline fields the atmosphere relaxes toward every tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForcing")]
pub struct ForcingFields {
    pub wind: Grid<Wind>,
    pub temperature: Grid<f64>,
    pub wetness: Grid<f64>,
}

#[derive(Deserialize)]
struct RawForcing {
    wind: Grid<Wind>,
    temperature: Grid<f64>,
    wetness: Grid<f64>,
}

impl TryFrom<RawForcing> for ForcingFields {
    type Error = AtmosphereError;

    fn try_from(raw: RawForcing) -> Result<Self> {
        ForcingFields::new(raw.wind, raw.temperature, raw.wetness)
    }
}

impl ForcingFields {
    /// Bundle the three forcing grids, requiring them to share one shape.
    pub fn new(wind: Grid<Wind>, temperature: Grid<f64>, wetness: Grid<f64>) -> Result<Self> {
        let shape = wind.shape();
        temperature.ensure_shape("temperature forcing", shape)?;
        wetness.ensure_shape("wetness forcing", shape)?;
        Ok(Self {
            wind,
            temperature,
            wetness,
        })
    }

    /// Spatially constant forcing.
    pub fn uniform(
        width: usize,
        height: usize,
        wind: Wind,
        temperature: f64,
        wetness: f64,
    ) -> Result<Self> {
        Ok(Self {
            wind: Grid::filled(width, height, wind)?,
            temperature: Grid::filled(width, height, temperature)?,
            wetness: Grid::filled(width, height, wetness)?,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.wind.shape()
    }

    /// Fail unless every forcing grid matches `expected`.
    pub fn ensure_shape(&self, expected: (usize, usize)) -> Result<()> {
        self.wind.ensure_shape("wind forcing", expected)?;
        self.temperature
            .ensure_shape("temperature forcing", expected)?;
        self.wetness.ensure_shape("wetness forcing", expected)
    }
}
