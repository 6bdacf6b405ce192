//! # Occlusion Pass Driver
//!
//! Runs one occlusion pass over regions ordered nearest first:
//!
//! ```text
//! begin_pass ─→ for each region: test bounds ─→ visible? draw occluders ─→ end_pass
//! ```
//!
//! A region can only hide regions processed after it, so the caller's
//! ordering decides how much gets culled. Coverage is rebuilt from scratch
//! on every pass.

use tracing::{debug, trace};
use umbra_occlusion::{Occluder, OcclusionConfig, OcclusionResult, OcclusionStats};

use crate::region::{RegionGeometry, RegionId, Visibility};

/// Camera state a pass was computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Camera position in world blocks.
    pub position: [f32; 3],
    /// Bumped whenever the view or projection matrix changes.
    pub version: u64,
}

impl ViewState {
    /// Creates a view state.
    #[must_use]
    pub const fn new(position: [f32; 3], version: u64) -> Self {
        Self { position, version }
    }

    /// Straight-line distance between two camera positions.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.position[0] - other.position[0];
        let dy = self.position[1] - other.position[1];
        let dz = self.position[2] - other.position[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Statistics for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Regions whose bounds were tested.
    pub regions_tested: u32,
    /// Regions found visible.
    pub regions_visible: u32,
    /// Regions found fully covered.
    pub regions_occluded: u32,
    /// Occluder polygons that added coverage.
    pub occluders_drawn: u32,
}

impl PassStats {
    /// Fraction of tested regions that were culled.
    #[must_use]
    pub fn cull_ratio(&self) -> f32 {
        if self.regions_tested == 0 {
            0.0
        } else {
            self.regions_occluded as f32 / self.regions_tested as f32
        }
    }
}

/// Owns an [`Occluder`] and runs passes over it.
pub struct OcclusionDriver {
    occluder: Occluder,
    last_view: Option<ViewState>,
    pass: PassStats,
}

impl OcclusionDriver {
    /// Creates a driver and its occluder.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: OcclusionConfig) -> OcclusionResult<Self> {
        Ok(Self {
            occluder: Occluder::new(config)?,
            last_view: None,
            pass: PassStats::default(),
        })
    }

    /// The underlying occluder.
    #[must_use]
    pub const fn occluder(&self) -> &Occluder {
        &self.occluder
    }

    /// Occluder counters for the current pass.
    #[must_use]
    pub const fn occluder_stats(&self) -> OcclusionStats {
        self.occluder.stats()
    }

    /// The view of the last pass started, if any.
    #[must_use]
    pub const fn last_view(&self) -> Option<ViewState> {
        self.last_view
    }

    /// Returns true if the results of the last pass are stale for `view`.
    #[must_use]
    pub fn needs_pass(&self, view: &ViewState) -> bool {
        match &self.last_view {
            None => true,
            Some(last) => {
                last.version != view.version
                    || last.distance(view) >= self.occluder.config().camera_move_threshold
            }
        }
    }

    /// Clears all coverage and starts a pass for `view`.
    pub fn begin_pass(&mut self, view: &ViewState) {
        self.occluder.reset();
        self.last_view = Some(*view);
        self.pass = PassStats::default();

        debug!(
            version = view.version,
            x = view.position[0],
            y = view.position[1],
            z = view.position[2],
            "occlusion pass started"
        );
    }

    /// Tests a region's bounds against the coverage drawn so far.
    ///
    /// Bounds that lie entirely off the raster have no pixel to show and are
    /// reported [`Visibility::Occluded`], the same as bounds hidden behind
    /// earlier occluders.
    pub fn test_region(&mut self, region: &RegionGeometry) -> Visibility {
        let visibility = Visibility::from(self.occluder.is_visible(&region.bounds));

        self.pass.regions_tested += 1;
        match visibility {
            Visibility::Visible => self.pass.regions_visible += 1,
            Visibility::Occluded => self.pass.regions_occluded += 1,
        }

        trace!(region = %region.id, ?visibility, "region tested");
        visibility
    }

    /// Draws a region's opaque polygons. Returns how many added coverage.
    pub fn add_occluders(&mut self, region: &RegionGeometry) -> u32 {
        let mut drawn = 0;
        for polygon in &region.occluders {
            if self.occluder.draw(polygon) {
                drawn += 1;
            }
        }

        self.pass.occluders_drawn += drawn;
        trace!(
            region = %region.id,
            drawn,
            submitted = region.occluders.len(),
            "region occluders drawn"
        );
        drawn
    }

    /// Tests a region and, when visible, adds its occluders.
    pub fn process_region(&mut self, region: &RegionGeometry) -> Visibility {
        let visibility = self.test_region(region);
        if visibility.is_visible() {
            self.add_occluders(region);
        }
        visibility
    }

    /// Processes regions in order and replaces `visible` with the ids of
    /// those that survived.
    pub fn cull(&mut self, regions: &[RegionGeometry], visible: &mut Vec<RegionId>) {
        visible.clear();
        for region in regions {
            if self.process_region(region).is_visible() {
                visible.push(region.id);
            }
        }
    }

    /// Finishes the pass and returns its statistics.
    pub fn end_pass(&mut self) -> PassStats {
        let occluder = self.occluder.stats();
        debug!(
            tested = self.pass.regions_tested,
            visible = self.pass.regions_visible,
            occluded = self.pass.regions_occluded,
            occluders = self.pass.occluders_drawn,
            tiles = occluder.tiles_visited,
            masks = occluder.masks_built,
            cull_ratio = self.pass.cull_ratio(),
            "occlusion pass finished"
        );
        self.pass
    }
}
