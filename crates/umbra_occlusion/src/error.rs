//! # Occlusion Error Types
//!
//! Errors only exist at construction boundaries. The rasterizer kernel itself
//! has no recoverable failure modes; broken invariants there are debug
//! assertions.

use thiserror::Error;

/// Errors that can occur while configuring the occluder or building polygons.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcclusionError {
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file is not valid TOML for [`crate::OcclusionConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {reason}")]
    ConfigRead {
        /// Path that was read.
        path: String,
        /// Underlying IO error message.
        reason: String,
    },

    /// An edge has a zero normal (a = b = 0) and cannot bound anything.
    #[error("degenerate edge {index}: a and b are both zero")]
    DegenerateEdge {
        /// Edge index within the polygon.
        index: usize,
    },

    /// Edge values would overflow `i32` on the largest supported raster.
    #[error("edge {index} exceeds the supported coordinate range")]
    CoordinateRange {
        /// Edge index within the polygon.
        index: usize,
    },

    /// Fewer than three distinct vertices were supplied.
    #[error("polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    /// The polygon has more edges than a tile can hold.
    #[error("polygon has {count} edges, maximum is {max}")]
    TooManyEdges {
        /// Edge count supplied.
        count: usize,
        /// Edge capacity of a tile.
        max: usize,
    },

    /// The vertices enclose no area.
    #[error("polygon has zero area")]
    ZeroArea,

    /// The vertices do not describe a convex polygon.
    #[error("polygon is not convex at vertex {0}")]
    NotConvex(usize),

    /// A packed coefficient buffer is not made of whole `(a, b, c)` triples.
    #[error("packed edge buffer length {0} is not a multiple of 3")]
    MalformedCoefficients(usize),
}

/// Result type for occlusion operations.
pub type OcclusionResult<T> = Result<T, OcclusionError>;
