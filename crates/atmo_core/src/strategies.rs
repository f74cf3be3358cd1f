//! Proptest strategies for atmosphere state, shared with downstream crates
//! through the `proptest-support` feature.

use proptest::prelude::*;

use crate::point::{AtmospherePoint, Wind};

/// Wind with both components in `[-1, 1]`.
pub fn unit_wind() -> impl Strategy<Value = Wind> {
    (-1.0f64..=1.0, -1.0f64..=1.0).prop_map(|(x, y)| Wind::new(x, y))
}

/// Point with every component in `[-1, 1]`.
pub fn unit_point() -> impl Strategy<Value = AtmospherePoint> {
    (unit_wind(), -1.0f64..=1.0, -1.0f64..=1.0)
        .prop_map(|(wind, temperature, wetness)| AtmospherePoint::new(wind, temperature, wetness))
}
