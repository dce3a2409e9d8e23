//! Common types shared across the coverage metadata crates: array
//! descriptors, affine and temporal references, extents and errors.

pub mod affine;
pub mod array;
pub mod attribute;
pub mod crs;
pub mod dimension;
pub mod error;
pub mod extent;
pub mod spatial;
pub mod temporal;

pub use affine::{AffineTransform, Point2};
pub use array::ArrayDescriptor;
pub use attribute::Attribute;
pub use crs::{AxisOrder, CrsCode};
pub use dimension::{Dimension, UNBOUNDED};
pub use error::{CoverageError, CoverageResult};
pub use extent::{Extent, SpatialBox, TemporalBounds};
pub use spatial::SpatialReference;
pub use temporal::{format_instant, parse_instant, Period, TemporalReference};
