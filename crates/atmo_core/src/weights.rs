//! Distance-to-weight policies used when gathering parcels into a cell.
//!
//! A policy only supplies the raw falloff curve; [`WeightNormalizer::normalize`]
//! turns a cell's collected contributions into a convex weighting so that the
//! scatter/gather mechanics never depend on the curve's shape.

use serde::{Deserialize, Serialize};

use crate::accumulator::Contribution;
use crate::error::{AtmosphereError, Result};
use crate::point::AtmospherePoint;

/// Narrow interface between gathered distances and blend weights.
pub trait WeightNormalizer {
    /// Raw weight for a parcel at `distance` cells from the destination.
    ///
    /// Must be finite and non-negative for every `distance >= 0`, including
    /// zero, and strictly decreasing wherever it is positive.
    fn weight(&self, distance: f64) -> f64;

    /// Convert contributions into `(weight, point)` pairs whose weights sum
    /// to one. An empty input yields the single pair `(1.0, default)`.
    ///
    /// If every raw weight underflows to zero the contributions share the
    /// weight evenly, which no longer favours nearer parcels.
    /// [`crate::params::AtmosphereParams::validate`] rejects built-in curves
    /// that can reach this case within the scatter disk.
    fn normalize(
        &self,
        contributions: &[Contribution],
        default: AtmospherePoint,
    ) -> Vec<(f64, AtmospherePoint)> {
        if contributions.is_empty() {
            return vec![(1.0, default)];
        }

        let raw: Vec<f64> = contributions
            .iter()
            .map(|contribution| self.weight(contribution.distance))
            .collect();
        let total: f64 = raw.iter().sum();

        if !(total.is_finite() && total > 0.0) {
            // Every parcel sits beyond the curve's reach; fall back to an even split.
            let share = 1.0 / contributions.len() as f64;
            return contributions
                .iter()
                .map(|contribution| (share, contribution.point))
                .collect();
        }

        raw.into_iter()
            .zip(contributions)
            .map(|(weight, contribution)| (weight / total, contribution.point))
            .collect()
    }
}

/// Built-in falloff curves selectable from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Falloff {
    /// `1 / (1 + d)^power`; `power = 2` is inverse-square.
    InversePower { power: f64 },
    /// `exp(-d^2 / (2 sigma^2))`.
    ///
    /// A small `sigma` underflows to zero within a few cells, and a cell whose
    /// parcels all underflow falls back to an even split. Parameter validation
    /// therefore requires the weight at `radius + sqrt(2)` to stay positive.
    Gaussian { sigma: f64 },
}

impl Default for Falloff {
    fn default() -> Self {
        Falloff::InversePower { power: 2.0 }
    }
}

impl Falloff {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Falloff::InversePower { power } => {
                if !(power.is_finite() && power > 0.0) {
                    return Err(AtmosphereError::InvalidParameter {
                        name: "falloff.power",
                        reason: format!("must be a positive finite number, got {power}"),
                    });
                }
            }
            Falloff::Gaussian { sigma } => {
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(AtmosphereError::InvalidParameter {
                        name: "falloff.sigma",
                        reason: format!("must be a positive finite number, got {sigma}"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl WeightNormalizer for Falloff {
    fn weight(&self, distance: f64) -> f64 {
        let distance = distance.max(0.0);
        match *self {
            Falloff::InversePower { power } => (1.0 + distance).powf(-power),
            Falloff::Gaussian { sigma } => (-(distance * distance) / (2.0 * sigma * sigma)).exp(),
        }
    }
}
