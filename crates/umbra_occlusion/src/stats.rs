//! Occluder statistics.

/// Counters accumulated since the last [`crate::Occluder::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OcclusionStats {
    /// Occluder polygons rasterized.
    pub occluders_drawn: u32,
    /// Occluder polygons that added no new coverage.
    pub occluders_rejected: u32,
    /// Visibility queries answered.
    pub queries: u32,
    /// Queries that found an uncovered pixel.
    pub queries_visible: u32,
    /// Tiles classified, all levels.
    pub tiles_visited: u64,
    /// Tiles that needed a per-edge mask.
    pub masks_built: u64,
}

impl OcclusionStats {
    /// Queries that were fully covered.
    #[must_use]
    pub const fn queries_occluded(&self) -> u32 {
        self.queries - self.queries_visible
    }

    /// Fraction of queries that were occluded, 0 when nothing was asked.
    #[must_use]
    pub fn occlusion_rate(&self) -> f32 {
        if self.queries == 0 {
            0.0
        } else {
            self.queries_occluded() as f32 / self.queries as f32
        }
    }
}
