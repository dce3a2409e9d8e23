//! Shared test utilities for the coverage metadata workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Floating-point assertion macros
//! - Builders for metadata wire strings
//! - Sample arrays in wire form
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{arrays, dimension_group, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of coordinate pairs.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

/// Macro for approximate equality of a box with `xmin`/`xmax`/`ymin`/`ymax`
/// fields against a `(xmin, xmax, ymin, ymax)` tuple.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_box_approx_eq;
///
/// assert_box_approx_eq!(extent, (-180.0, 180.0, -90.0, 90.0), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_box_approx_eq {
    ($actual:expr, ($xmin:expr, $xmax:expr, $ymin:expr, $ymax:expr), $epsilon:expr) => {{
        let actual = &$actual;
        $crate::assert_approx_eq!(actual.xmin, $xmin, $epsilon);
        $crate::assert_approx_eq!(actual.xmax, $xmax, $epsilon);
        $crate::assert_approx_eq!(actual.ymin, $ymin, $epsilon);
        $crate::assert_approx_eq!(actual.ymax, $ymax, $epsilon);
    }};
}
