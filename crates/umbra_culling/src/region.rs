//! Regions submitted for occlusion testing.

use std::fmt;

use umbra_occlusion::Polygon;

/// Caller-assigned identifier of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

/// Screen-space geometry of one region, already projected to pixels.
#[derive(Debug, Clone)]
pub struct RegionGeometry {
    /// Region identifier.
    pub id: RegionId,
    /// Projected bounding volume, tested for visibility.
    pub bounds: Polygon,
    /// Opaque faces drawn as occluders once the region is found visible.
    pub occluders: Vec<Polygon>,
}

impl RegionGeometry {
    /// Creates a region with no occluders.
    #[must_use]
    pub fn new(id: RegionId, bounds: Polygon) -> Self {
        Self {
            id,
            bounds,
            occluders: Vec::new(),
        }
    }

    /// Adds an opaque polygon.
    #[must_use]
    pub fn with_occluder(mut self, polygon: Polygon) -> Self {
        self.occluders.push(polygon);
        self
    }
}

/// Outcome of a region test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// At least one pixel of the bounds is uncovered.
    Visible,
    /// Every pixel of the bounds is already covered.
    Occluded,
}

impl Visibility {
    /// Returns true for [`Visibility::Visible`].
    #[inline]
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Self::Visible
        } else {
            Self::Occluded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_id_display() {
        assert_eq!(RegionId(7).to_string(), "region#7");
    }

    #[test]
    fn test_visibility_from_bool() {
        assert!(Visibility::from(true).is_visible());
        assert_eq!(Visibility::from(false), Visibility::Occluded);
    }
}
