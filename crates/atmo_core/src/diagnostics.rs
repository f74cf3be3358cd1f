use serde::Serialize;

use crate::grid::Grid;
use crate::point::AtmospherePoint;

/// Grid-wide aggregates reported alongside each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FieldSummary {
    pub mean_temperature: f64,
    pub mean_wetness: f64,
    pub mean_wind_speed: f64,
    pub max_wind_speed: f64,
}

impl FieldSummary {
    pub fn of(grid: &Grid<AtmospherePoint>) -> Self {
        let cells = grid.as_slice();
        if cells.is_empty() {
            return Self::default();
        }

        let mut temperature = 0.0;
        let mut wetness = 0.0;
        let mut speed = 0.0;
        let mut max_speed: f64 = 0.0;
        for point in cells {
            let cell_speed = point.wind.speed();
            temperature += point.temperature;
            wetness += point.wetness;
            speed += cell_speed;
            max_speed = max_speed.max(cell_speed);
        }

        let count = cells.len() as f64;
        Self {
            mean_temperature: temperature / count,
            mean_wetness: wetness / count,
            mean_wind_speed: speed / count,
            max_wind_speed: max_speed,
        }
    }
}
