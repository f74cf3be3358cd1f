use tracing::trace;

/// Integer offsets `(dx, dy)` within Euclidean distance `radius` of the origin.
///
/// Built once per layer and reused unchanged by every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborhoodOffsets {
    radius: u32,
    offsets: Vec<(i64, i64)>,
}

impl NeighborhoodOffsets {
    pub fn new(radius: u32) -> Self {
        let r = i64::from(radius);
        let limit = r * r;
        let mut offsets = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > limit {
                    continue;
                }
                offsets.push((dx, dy));
            }
        }
        trace!(radius, count = offsets.len(), "built neighbourhood disk");
        Self { radius, offsets }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.offsets.iter().copied()
    }
}
