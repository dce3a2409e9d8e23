//! Spatial and temporal extents of a coverage.

use serde::{Deserialize, Serialize};

use crate::affine::Point2;
use crate::error::{CoverageError, CoverageResult};

/// An axis-aligned box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpatialBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl SpatialBox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// The all-zero box reported when an extent cannot be computed.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Smallest box enclosing every point.
    pub fn enclosing(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Self::new(first.x, first.x, first.y, first.y);
        for p in &points[1..] {
            b.xmin = b.xmin.min(p.x);
            b.xmax = b.xmax.max(p.x);
            b.ymin = b.ymin.min(p.y);
            b.ymax = b.ymax.max(p.y);
        }
        Some(b)
    }

    /// Parse a subset string `xmin,ymin,xmax,ymax`.
    pub fn from_bbox_string(s: &str) -> CoverageResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(CoverageError::invalid_parameter(
                "bbox",
                format!("expected 'xmin,ymin,xmax,ymax', got '{}'", s),
            ));
        }

        let mut v = [0.0; 4];
        for (slot, part) in v.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                CoverageError::invalid_parameter("bbox", format!("invalid number '{}'", part))
            })?;
        }
        Ok(Self::new(v[0], v[2], v[1], v[3]))
    }

    /// Corners in the order lower-left, lower-right, upper-right, upper-left.
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.xmin, self.ymin),
            Point2::new(self.xmax, self.ymin),
            Point2::new(self.xmax, self.ymax),
            Point2::new(self.xmin, self.ymax),
        ]
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// True for the zero box and any box without area.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Exchange the roles of x and y.
    pub fn swapped(&self) -> Self {
        Self::new(self.ymin, self.ymax, self.xmin, self.xmax)
    }
}

/// First and last instant of a temporal coverage, ISO-8601 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalBounds {
    pub tmin: String,
    pub tmax: String,
}

/// Populated range of a coverage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalBounds>,
}

impl Extent {
    pub fn is_empty(&self) -> bool {
        self.spatial.is_none() && self.temporal.is_none()
    }
}
