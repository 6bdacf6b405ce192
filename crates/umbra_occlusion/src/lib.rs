//! # UMBRA Occlusion Rasterizer
//!
//! Software coverage rasterizer for occlusion culling:
//! - Convex polygons in integer pixel space
//! - 8×8 tiles producing 64-bit coverage masks
//! - Incremental edge classification, no per-pixel evaluation above the leaf
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     OCCLUDER HIERARCHY                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Polygon → Edge functions → Tile cursor (one per level)       │
//! │                                 ↓                             │
//! │        classify: Outside │ Intersecting │ Inside              │
//! │                                 ↓                             │
//! │     Empty / Full / Partial(mask) → coverage arena per level   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Integer math only
//! - No allocations after [`Occluder::new`]
//! - Coverage is conservative: a pixel is only marked when it is inside

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod edge;
pub mod error;
pub mod hierarchy;
pub mod mask;
pub mod polygon;
pub mod stats;
pub mod tile;

pub use config::{OcclusionConfig, MAX_LEVELS, MAX_RASTER_SIZE};
pub use edge::{Classification, Edge, EdgeCoefficients, EdgeFunction, EdgePosition, EdgeState};
pub use error::{OcclusionError, OcclusionResult};
pub use hierarchy::Occluder;
pub use polygon::{PixelBounds, Polygon};
pub use stats::OcclusionStats;
pub use tile::{diameter_for_level, Tile, TileCoverage, MAX_EDGES};
