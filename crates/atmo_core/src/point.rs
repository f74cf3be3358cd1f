//! Per-cell atmospheric state and the weighted fold that averages it.

use serde::{Deserialize, Serialize};

/// Wind vector in cells per tick, scaled so that a unit component moves a
/// parcel by the layer's maximum speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub x: f64,
    pub y: f64,
}

impl Wind {
    pub const CALM: Wind = Wind { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn speed(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Atmospheric state of one cell for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AtmospherePoint {
    pub wind: Wind,
    pub temperature: f64,
    pub wetness: f64,
}

impl AtmospherePoint {
    /// Identity value for cells that receive no parcel.
    pub const ZERO: AtmospherePoint = AtmospherePoint {
        wind: Wind::CALM,
        temperature: 0.0,
        wetness: 0.0,
    };

    pub const fn new(wind: Wind, temperature: f64, wetness: f64) -> Self {
        Self {
            wind,
            temperature,
            wetness,
        }
    }

    /// Add `point * weight` component-wise to `self`.
    pub fn accumulate(self, weight: f64, point: &AtmospherePoint) -> Self {
        Self {
            wind: Wind {
                x: self.wind.x + point.wind.x * weight,
                y: self.wind.y + point.wind.y * weight,
            },
            temperature: self.temperature + point.temperature * weight,
            wetness: self.wetness + point.wetness * weight,
        }
    }
}

/// Fold `(weight, point)` pairs onto [`AtmospherePoint::ZERO`].
///
/// With weights summing to one the result is the weighted average.
pub fn blend<'a, I>(weighted: I) -> AtmospherePoint
where
    I: IntoIterator<Item = &'a (f64, AtmospherePoint)>,
{
    weighted
        .into_iter()
        .fold(AtmospherePoint::ZERO, |acc, (weight, point)| {
            acc.accumulate(*weight, point)
        })
}
