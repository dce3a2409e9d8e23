//! Affine transformations between array index space and world coordinates.
//!
//! An [`AffineTransform`] maps integer array coordinates `(col, row)` of a
//! raster to spatially referenced world coordinates:
//!
//! ```text
//! x = x0 + a11 * col + a12 * row
//! y = y0 + a21 * col + a22 * row
//! ```
//!
//! The inverse is computed once from the closed-form 2x2 matrix inverse and
//! memoized as plain coefficients. The transform returned by
//! [`AffineTransform::inverted`] carries the original coefficients as its own
//! memoized inverse, so inverting twice yields the original exactly.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoverageError, CoverageResult};

/// Maximum number of fractional digits in the textual form.
const MAX_FRACTION_DIGITS: usize = 16;

/// A two-dimensional point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// The six parameters of an affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    x0: f64,
    y0: f64,
    a11: f64,
    a12: f64,
    a21: f64,
    a22: f64,
}

impl Coefficients {
    fn determinant(&self) -> f64 {
        self.a11 * self.a22 - self.a12 * self.a21
    }

    fn apply(&self, x: f64, y: f64) -> Point2 {
        Point2 {
            x: self.x0 + self.a11 * x + self.a12 * y,
            y: self.y0 + self.a21 * x + self.a22 * y,
        }
    }

    fn invert(&self) -> CoverageResult<Coefficients> {
        let d = self.determinant();
        if d == 0.0 || !d.is_finite() {
            return Err(CoverageError::IllConditionedTransform { determinant: d });
        }

        let a11 = self.a22 / d;
        let a12 = -self.a12 / d;
        let a21 = -self.a21 / d;
        let a22 = self.a11 / d;

        Ok(Coefficients {
            x0: -(a11 * self.x0 + a12 * self.y0),
            y0: -(a21 * self.x0 + a22 * self.y0),
            a11,
            a12,
            a21,
            a22,
        })
    }
}

/// Affine map from array index coordinates to world coordinates.
///
/// The coefficients are fixed at construction; the inverse is written at
/// most once and is safe to share across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffineTransform {
    x0: f64,
    y0: f64,
    a11: f64,
    a12: f64,
    a21: f64,
    a22: f64,
    #[serde(skip)]
    inverse: OnceLock<Coefficients>,
}

impl AffineTransform {
    /// Create a transform from all six parameters.
    pub fn new(x0: f64, y0: f64, a11: f64, a12: f64, a21: f64, a22: f64) -> Self {
        Self {
            x0,
            y0,
            a11,
            a12,
            a21,
            a22,
            inverse: OnceLock::new(),
        }
    }

    /// The identity transformation.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0, 0.0, 0.0, 1.0)
    }

    /// A pure translation by `(x0, y0)`.
    pub fn translation(x0: f64, y0: f64) -> Self {
        Self::new(x0, y0, 1.0, 0.0, 0.0, 1.0)
    }

    /// An axis-aligned transform with cell sizes `a11` and `a22`.
    pub fn scale(x0: f64, y0: f64, a11: f64, a22: f64) -> Self {
        Self::new(x0, y0, a11, 0.0, 0.0, a22)
    }

    fn from_coefficients(c: Coefficients) -> Self {
        Self::new(c.x0, c.y0, c.a11, c.a12, c.a21, c.a22)
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients {
            x0: self.x0,
            y0: self.y0,
            a11: self.a11,
            a12: self.a12,
            a21: self.a21,
            a22: self.a22,
        }
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn y0(&self) -> f64 {
        self.y0
    }

    pub fn a11(&self) -> f64 {
        self.a11
    }

    pub fn a12(&self) -> f64 {
        self.a12
    }

    pub fn a21(&self) -> f64 {
        self.a21
    }

    pub fn a22(&self) -> f64 {
        self.a22
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.coefficients().determinant()
    }

    /// Check whether this is exactly the identity transformation.
    pub fn is_identity(&self) -> bool {
        self.a11 == 1.0
            && self.a12 == 0.0
            && self.a21 == 0.0
            && self.a22 == 1.0
            && self.x0 == 0.0
            && self.y0 == 0.0
    }

    /// Apply the transformation to a point.
    pub fn forward(&self, p: Point2) -> Point2 {
        self.coefficients().apply(p.x, p.y)
    }

    /// Apply the transformation writing into a caller-owned point.
    pub fn forward_into(&self, p_in: &Point2, p_out: &mut Point2) {
        p_out.x = self.x0 + self.a11 * p_in.x + self.a12 * p_in.y;
        p_out.y = self.y0 + self.a21 * p_in.x + self.a22 * p_in.y;
    }

    /// Inverse coefficients, computed on first use.
    fn inverse_coefficients(&self) -> CoverageResult<Coefficients> {
        if let Some(inv) = self.inverse.get() {
            return Ok(*inv);
        }
        let inv = self.coefficients().invert()?;
        // A concurrent caller may have won the race with identical values.
        let _ = self.inverse.set(inv);
        Ok(inv)
    }

    /// Apply the inverse transformation to a point.
    ///
    /// Fails with [`CoverageError::IllConditionedTransform`] when the
    /// determinant is zero instead of producing NaN coordinates.
    pub fn inverse(&self, p: Point2) -> CoverageResult<Point2> {
        Ok(self.inverse_coefficients()?.apply(p.x, p.y))
    }

    /// Apply the inverse transformation writing into a caller-owned point.
    pub fn inverse_into(&self, p_in: &Point2, p_out: &mut Point2) -> CoverageResult<()> {
        *p_out = self.inverse(*p_in)?;
        Ok(())
    }

    /// The inverse as a transform of its own.
    pub fn inverted(&self) -> CoverageResult<AffineTransform> {
        let inv = Self::from_coefficients(self.inverse_coefficients()?);
        let _ = inv.inverse.set(self.coefficients());
        Ok(inv)
    }

    /// Parse the textual `key=value` form, logging and stopping at the first
    /// malformed pair or unknown key.
    ///
    /// Pairs parsed before the problem are kept; parameters that were never
    /// given keep their identity defaults.
    pub fn parse(s: &str) -> AffineTransform {
        let (transform, problem) = parse_pairs(s);
        if let Some(problem) = problem {
            warn!(input = %s, "Cannot read affine transformation string: {}", problem);
        }
        transform
    }

    /// Parse the textual form, rejecting any malformed pair or unknown key.
    pub fn try_parse(s: &str) -> CoverageResult<AffineTransform> {
        match parse_pairs(s) {
            (transform, None) => Ok(transform),
            (_, Some(problem)) => Err(CoverageError::InvalidAffineTransform(problem)),
        }
    }

    /// Serialize to the canonical textual form.
    pub fn format(&self) -> String {
        format!(
            "x0={} y0={} a11={} a22={} a12={} a21={}",
            format_coefficient(self.x0),
            format_coefficient(self.y0),
            format_coefficient(self.a11),
            format_coefficient(self.a22),
            format_coefficient(self.a12),
            format_coefficient(self.a21),
        )
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for AffineTransform {
    fn eq(&self, other: &Self) -> bool {
        self.coefficients() == other.coefficients()
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for AffineTransform {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

fn parse_pairs(s: &str) -> (AffineTransform, Option<String>) {
    let mut c = AffineTransform::identity().coefficients();

    for pair in s.split([',', ' ']).filter(|p| !p.is_empty()) {
        let kv: Vec<&str> = pair.split(['=', ':']).collect();
        if kv.len() != 2 {
            return (AffineTransform::from_coefficients(c), Some(format!("malformed pair '{}'", pair)));
        }

        let value: f64 = match kv[1].trim().parse() {
            Ok(v) => v,
            Err(_) => {
                return (
                    AffineTransform::from_coefficients(c),
                    Some(format!("invalid number '{}' for '{}'", kv[1], kv[0])),
                )
            }
        };

        match kv[0].trim() {
            "x0" => c.x0 = value,
            "y0" => c.y0 = value,
            "a11" => c.a11 = value,
            "a12" => c.a12 = value,
            "a21" => c.a21 = value,
            "a22" => c.a22 = value,
            other => {
                return (
                    AffineTransform::from_coefficients(c),
                    Some(format!("unknown parameter '{}'", other)),
                )
            }
        }
    }

    (AffineTransform::from_coefficients(c), None)
}

fn format_coefficient(value: f64) -> String {
    let mut s = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
