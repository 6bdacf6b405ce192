//! # UMBRA Culling
//!
//! Region-level occlusion culling on top of [`umbra_occlusion`]:
//! - Regions arrive nearest first with projected bounds and opaque faces
//! - Visible regions become occluders for everything behind them
//! - Passes are only rebuilt when the view changes or the camera moves
//!
//! ## Example
//!
//! ```
//! use umbra_culling::{OcclusionDriver, RegionGeometry, RegionId, ViewState};
//! use umbra_occlusion::{OcclusionConfig, Polygon};
//!
//! let mut driver = OcclusionDriver::new(OcclusionConfig::new(256, 256, 2).unwrap()).unwrap();
//! let view = ViewState::new([0.0, 64.0, 0.0], 1);
//!
//! let wall = RegionGeometry::new(RegionId(1), Polygon::rectangle(0, 0, 255, 255).unwrap())
//!     .with_occluder(Polygon::rectangle(0, 0, 255, 255).unwrap());
//! let behind = RegionGeometry::new(RegionId(2), Polygon::rectangle(40, 40, 90, 90).unwrap());
//!
//! let mut visible = Vec::new();
//! if driver.needs_pass(&view) {
//!     driver.begin_pass(&view);
//!     driver.cull(&[wall, behind], &mut visible);
//!     driver.end_pass();
//! }
//! assert_eq!(visible, vec![RegionId(1)]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod driver;
pub mod region;

pub use driver::{OcclusionDriver, PassStats, ViewState};
pub use region::{RegionGeometry, RegionId, Visibility};
