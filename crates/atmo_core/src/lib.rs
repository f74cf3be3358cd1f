pub mod accumulator;
pub mod diagnostics;
pub mod error;
pub mod forcing;
pub mod grid;
pub mod io;
pub mod layer;
pub mod neighborhood;
pub mod params;
pub mod point;
#[cfg(any(test, feature = "proptest-support"))]
pub mod strategies;
pub mod weights;
pub mod world;

use anyhow::{ensure, Context, Result};

pub use error::AtmosphereError;
pub use forcing::{ForcingFields, LandCover};
pub use grid::Grid;
pub use layer::{AtmosphereLayer, TickStats};
pub use params::AtmosphereParams;
pub use point::{AtmospherePoint, Wind};
pub use weights::{Falloff, WeightNormalizer};
pub use world::AtmosphereWorld;

/// Execute a single deterministic atmosphere tick.
///
/// Runs the layer update from the world's current grid into its next grid,
/// swaps the two and records `tick` as the world's tick. Ticks must be
/// requested in order.
pub fn tick_once(world: &mut AtmosphereWorld, tick: u64) -> Result<TickStats> {
    ensure!(
        tick == world.tick + 1,
        "tick_once called with out-of-order tick: current={} requested={}",
        world.tick,
        tick
    );

    let stats = world
        .step()
        .with_context(|| format!("atmosphere update failed at tick {}", tick))?;
    world.tick = tick;

    Ok(stats)
}
