use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::diagnostics::FieldSummary;
use crate::layer::TickStats;
use crate::point::AtmospherePoint;
use crate::world::AtmosphereWorld;

#[derive(Clone, Debug, Serialize)]
pub struct FrameWorldMeta {
    pub width: usize,
    pub height: usize,
}

/// One NDJSON line describing the world after a tick.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub t: u64,
    pub world: FrameWorldMeta,
    pub stats: TickStats,
    pub summary: FieldSummary,
    /// Row-major cell states, only present when requested.
    pub cells: Option<Vec<AtmospherePoint>>,
}

pub fn make_frame(world: &AtmosphereWorld, stats: TickStats, emit_cells: bool) -> Frame {
    let current = world.current();
    Frame {
        t: world.tick,
        world: FrameWorldMeta {
            width: world.width(),
            height: world.height(),
        },
        stats,
        summary: FieldSummary::of(current),
        cells: emit_cells.then(|| current.as_slice().to_vec()),
    }
}

impl Frame {
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        Ok(json)
    }
}
