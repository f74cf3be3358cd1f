use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_seeder::Seeder;
use serde::Deserialize;
use tracing::warn;

use crate::forcing::{ForcingFields, LandCover};
use crate::grid::Grid;
use crate::params::AtmosphereParams;
use crate::point::{AtmospherePoint, Wind};
use crate::world::AtmosphereWorld;

/// Parsed seed definition describing the deterministic initial world.
#[derive(Clone, Debug, Deserialize)]
pub struct Seed {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    #[serde(default)]
    pub atmosphere: AtmosphereParams,
    pub prevailing: Prevailing,
    #[serde(default)]
    pub forest_fraction: f64,
    #[serde(default)]
    pub land_cover: LandCover,
    #[serde(default)]
    pub initial: InitialNoise,
}

/// Baseline fields by latitude, used to build the forcing grids.
#[derive(Clone, Debug, Deserialize)]
pub struct Prevailing {
    pub wind: WindBands,
    pub temperature: Gradient,
    pub wetness: Gradient,
}

/// Zonal wind strength per circulation band. Trades and polar easterlies
/// blow toward -x, westerlies toward +x.
#[derive(Clone, Debug, Deserialize)]
pub struct WindBands {
    pub trades: f64,
    pub westerlies: f64,
    pub polar: f64,
}

/// Linear equator-to-pole profile.
#[derive(Clone, Debug, Deserialize)]
pub struct Gradient {
    pub equator: f64,
    pub poles: f64,
}

/// Amplitude of random perturbation applied to the initial state.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InitialNoise {
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub wetness: f64,
}

impl Seed {
    /// Load a seed JSON document from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open seed file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Deserialize a seed document from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("invalid seed json")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "seed {} must have non-zero dimensions, got {}x{}",
            self.name,
            self.width,
            self.height
        );
        ensure!(
            (0.0..=1.0).contains(&self.forest_fraction),
            "seed {} forest_fraction must lie in [0, 1], got {}",
            self.name,
            self.forest_fraction
        );
        ensure!(
            self.initial.temperature >= 0.0 && self.initial.wetness >= 0.0,
            "seed {} initial noise amplitudes must be non-negative",
            self.name
        );
        self.atmosphere
            .validate()
            .with_context(|| format!("seed {} has invalid atmosphere parameters", self.name))
    }
}

/// Realise an [`AtmosphereWorld`] from the given seed description.
pub fn build_world(seed: &Seed, world_seed_override: Option<u64>) -> Result<AtmosphereWorld> {
    seed.validate()?;
    if !seed.atmosphere.is_default() {
        warn!(seed = %seed.name, "seed overrides default atmosphere parameters");
    }

    let world_seed = world_seed_override.unwrap_or(seed.seed);
    let mut rng: ChaCha8Rng = Seeder::from((seed.name.as_str(), world_seed)).make_rng();
    let (width, height) = (seed.width, seed.height);

    let wind = Grid::from_fn(width, height, |_, y| {
        prevailing_wind(&seed.prevailing.wind, latitude_from_grid(y, height))
    })?;
    let temperature = Grid::from_fn(width, height, |_, y| {
        along_gradient(&seed.prevailing.temperature, latitude_from_grid(y, height))
    })?;
    let wetness = Grid::from_fn(width, height, |_, y| {
        along_gradient(&seed.prevailing.wetness, latitude_from_grid(y, height))
    })?;

    let land_cover = Grid::from_fn(width, height, |_, _| {
        if rng.gen_bool(seed.forest_fraction) {
            LandCover::Forest
        } else {
            seed.land_cover
        }
    })?;

    let initial = Grid::from_fn(width, height, |x, y| {
        let offset = y * width + x;
        let temperature_noise = rng.gen_range(-1.0..=1.0) * seed.initial.temperature;
        let wetness_noise = rng.gen_range(-1.0..=1.0) * seed.initial.wetness;
        AtmospherePoint::new(
            wind.as_slice()[offset],
            temperature.as_slice()[offset] + temperature_noise,
            wetness.as_slice()[offset] + wetness_noise,
        )
    })?;

    let forcing = ForcingFields::new(wind, temperature, wetness)?;
    Ok(AtmosphereWorld::new(
        world_seed,
        seed.atmosphere,
        initial,
        forcing,
        land_cover,
    )?)
}

fn latitude_from_grid(y: usize, height: usize) -> f64 {
    let ratio = (y as f64 + 0.5) / height as f64;
    90.0 - ratio * 180.0
}

fn prevailing_wind(bands: &WindBands, latitude_deg: f64) -> Wind {
    let abs_lat = latitude_deg.abs();
    if abs_lat < 30.0 {
        Wind::new(-bands.trades, 0.0)
    } else if abs_lat < 60.0 {
        Wind::new(bands.westerlies, 0.0)
    } else {
        Wind::new(-bands.polar, 0.0)
    }
}

fn along_gradient(gradient: &Gradient, latitude_deg: f64) -> f64 {
    let ratio = (latitude_deg.abs() / 90.0).clamp(0.0, 1.0);
    gradient.equator + (gradient.poles - gradient.equator) * ratio
}
