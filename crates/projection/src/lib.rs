//! Coordinate reprojection for coverage extents.
//!
//! Point transformation is delegated to a [`Reprojector`], by default the
//! proj4rs-backed [`Proj4Reprojector`]. On top of it this crate computes the
//! bounding box of a coverage in WGS84 from its native CRS: all four corners
//! are transformed, the enclosing box is taken, and x/y are exchanged when
//! the two CRS disagree on axis order.

pub mod definition;
pub mod error;
pub mod extent;
pub mod reprojector;

pub use definition::{CrsDefinition, WGS84_PROJ4};
pub use error::{ProjectionError, ProjectionResult};
pub use extent::{reproject_extent, reproject_extent_or_zero, wgs84_extent};
pub use reprojector::{Proj4Reprojector, Reprojector};
