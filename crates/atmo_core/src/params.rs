use serde::{Deserialize, Serialize};

use crate::error::{AtmosphereError, Result};
use crate::weights::{Falloff, WeightNormalizer};

/// Distance a unit wind component carries a parcel in one tick, in cells.
pub const MAX_WIND_SPEED: f64 = 4.0;
/// Radius of the scatter disk around each advected parcel, in cells.
pub const SCATTER_RADIUS: u32 = 3;
/// Multiplier applied to the wind of forested cells.
pub const FOREST_WIND_DAMPING: f64 = 0.95;
/// Share of diffused wind kept each tick; the rest relaxes toward forcing.
pub const WIND_RETENTION: f64 = 0.95;
/// Share of diffused temperature kept each tick.
pub const TEMPERATURE_RETENTION: f64 = 0.75;
/// Share of diffused wetness kept each tick.
pub const WETNESS_RETENTION: f64 = 0.75;

/// Constants fixed at layer construction.
///
/// Each `*_retention` value is the `AK` half of a blend pair; the forcing
/// weight is always `1 - retention`, so every pair sums to one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereParams {
    pub max_speed: f64,
    pub radius: u32,
    pub forest_wind_damping: f64,
    pub wind_retention: f64,
    pub temperature_retention: f64,
    pub wetness_retention: f64,
    pub falloff: Falloff,
}

impl Default for AtmosphereParams {
    fn default() -> Self {
        Self {
            max_speed: MAX_WIND_SPEED,
            radius: SCATTER_RADIUS,
            forest_wind_damping: FOREST_WIND_DAMPING,
            wind_retention: WIND_RETENTION,
            temperature_retention: TEMPERATURE_RETENTION,
            wetness_retention: WETNESS_RETENTION,
            falloff: Falloff::default(),
        }
    }
}

impl AtmosphereParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(AtmosphereError::InvalidParameter {
                name: "max_speed",
                reason: format!("must be finite and non-negative, got {}", self.max_speed),
            });
        }
        unit_interval("forest_wind_damping", self.forest_wind_damping)?;
        unit_interval("wind_retention", self.wind_retention)?;
        unit_interval("temperature_retention", self.temperature_retention)?;
        unit_interval("wetness_retention", self.wetness_retention)?;
        self.falloff.validate()?;
        // A disk offset of length `radius` lands at most `radius + sqrt(2)` away
        // once floored, so the curve must still be positive there.
        let reach = f64::from(self.radius) + std::f64::consts::SQRT_2;
        if self.falloff.weight(reach) <= 0.0 {
            return Err(AtmosphereError::InvalidParameter {
                name: "falloff",
                reason: format!(
                    "weight underflows to zero within the scatter reach of {reach:.3} cells"
                ),
            });
        }
        Ok(())
    }

    pub fn wind_forcing(&self) -> f64 {
        1.0 - self.wind_retention
    }

    pub fn temperature_forcing(&self) -> f64 {
        1.0 - self.temperature_retention
    }

    pub fn wetness_forcing(&self) -> f64 {
        1.0 - self.wetness_retention
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AtmosphereError::InvalidParameter {
            name,
            reason: format!("must lie in [0, 1], got {value}"),
        });
    }
    Ok(())
}
