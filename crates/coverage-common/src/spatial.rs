//! Spatial reference of an array.

use serde::{Deserialize, Serialize};

use crate::affine::AffineTransform;
use crate::crs::{axis_order_from_proj4, axis_order_from_wkt, AxisOrder, CrsCode};

/// Ties two array dimensions to a CRS through an affine transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialReference {
    /// Dimension that maps to world x.
    pub xdim: String,
    /// Dimension that maps to world y.
    pub ydim: String,
    pub auth_name: String,
    pub auth_id: i32,
    pub affine: AffineTransform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proj4: Option<String>,
}

impl SpatialReference {
    pub fn new(
        xdim: impl Into<String>,
        ydim: impl Into<String>,
        auth_name: impl Into<String>,
        auth_id: i32,
        affine: AffineTransform,
    ) -> Self {
        Self {
            xdim: xdim.into(),
            ydim: ydim.into(),
            auth_name: auth_name.into(),
            auth_id,
            affine,
            wkt: None,
            proj4: None,
        }
    }

    pub fn crs_code(&self) -> CrsCode {
        CrsCode::new(self.auth_name.clone(), self.auth_id)
    }

    /// Axis order of the native CRS.
    ///
    /// Looks at the PROJ string first, then the WKT; an authority code alone
    /// is read as easting first.
    pub fn axis_order(&self) -> AxisOrder {
        self.proj4
            .as_deref()
            .and_then(axis_order_from_proj4)
            .or_else(|| self.wkt.as_deref().and_then(axis_order_from_wkt))
            .unwrap_or(AxisOrder::XY)
    }
}
