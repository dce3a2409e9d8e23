//! Resolution of a spatial reference to a usable CRS definition.

use coverage_common::{AxisOrder, CrsCode, SpatialReference};

use crate::error::{ProjectionError, ProjectionResult};

/// WGS84 geographic coordinates, longitude first.
pub const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// A CRS as the reprojector consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsDefinition {
    pub code: Option<CrsCode>,
    /// PROJ string without any `+axis` parameter.
    pub proj4: String,
    /// Coordinate order in which the CRS publishes its axes.
    pub axis_order: AxisOrder,
}

impl CrsDefinition {
    /// The fixed target of extent reprojection: WGS84, longitude first.
    pub fn wgs84() -> Self {
        Self {
            code: Some(CrsCode::epsg(4326)),
            proj4: WGS84_PROJ4.to_string(),
            axis_order: AxisOrder::XY,
        }
    }

    /// Definition from a PROJ string; `+axis` only sets the axis order.
    pub fn from_proj4(proj4: &str) -> Self {
        let axis_order = coverage_common::crs::axis_order_from_proj4(proj4).unwrap_or_default();
        let proj4 = proj4
            .split_whitespace()
            .filter(|t| !t.starts_with("+axis="))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            code: None,
            proj4,
            axis_order,
        }
    }

    /// Definition for a well-known EPSG code.
    pub fn from_epsg(code: i32) -> ProjectionResult<Self> {
        let proj4 = epsg_proj4(code).ok_or_else(|| ProjectionError::UnsupportedCrs(format!("EPSG:{}", code)))?;
        Ok(Self {
            code: Some(CrsCode::epsg(code)),
            proj4,
            axis_order: AxisOrder::XY,
        })
    }

    /// Resolve the native CRS of a spatial reference.
    ///
    /// The PROJ string wins when present, then the EPSG table. A WKT-only
    /// reference cannot be resolved.
    pub fn from_spatial_reference(srs: &SpatialReference) -> ProjectionResult<Self> {
        let mut def = match srs.proj4.as_deref() {
            Some(p) => Self::from_proj4(p),
            None if srs.crs_code().is_epsg() => Self::from_epsg(srs.auth_id)?,
            None => return Err(ProjectionError::UnsupportedCrs(srs.crs_code().to_string())),
        };
        def.code = Some(srs.crs_code());
        def.axis_order = srs.axis_order();
        Ok(def)
    }

    /// Whether coordinates are angles rather than lengths.
    pub fn is_geographic(&self) -> bool {
        self.proj4
            .split_whitespace()
            .any(|t| t == "+proj=longlat" || t == "+proj=latlong" || t == "+proj=lonlat" || t == "+proj=latlon")
    }
}

fn epsg_proj4(code: i32) -> Option<String> {
    let s = match code {
        4326 => WGS84_PROJ4.to_string(),
        4269 => "+proj=longlat +datum=NAD83 +no_defs".to_string(),
        4258 => "+proj=longlat +ellps=GRS80 +no_defs".to_string(),
        3857 | 900913 => {
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs".to_string()
        }
        32601..=32660 => format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", code - 32600),
        32701..=32760 => format!("+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs", code - 32700),
        _ => return None,
    };
    Some(s)
}
