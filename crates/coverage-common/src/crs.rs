//! Coordinate Reference System identity and axis order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisOrder {
    /// X (longitude/easting), Y (latitude/northing)
    #[default]
    XY,
    /// Y (latitude/northing), X (longitude/easting)
    LatLon,
}

/// Authority-qualified CRS code such as `EPSG:4326`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrsCode {
    pub authority: String,
    pub code: i32,
}

impl CrsCode {
    pub fn new(authority: impl Into<String>, code: i32) -> Self {
        Self {
            authority: authority.into(),
            code,
        }
    }

    pub fn epsg(code: i32) -> Self {
        Self::new("EPSG", code)
    }

    /// Parse `AUTH:CODE`, case-insensitive on the authority.
    pub fn parse(s: &str) -> Option<Self> {
        let (authority, code) = s.trim().split_once(':')?;
        let code = code.trim().parse().ok()?;
        Some(Self::new(authority.trim().to_uppercase(), code))
    }

    pub fn is_epsg(&self) -> bool {
        self.authority.eq_ignore_ascii_case("EPSG")
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// Axis order declared by a PROJ string's `+axis=` parameter.
pub fn axis_order_from_proj4(proj4: &str) -> Option<AxisOrder> {
    proj4
        .split_whitespace()
        .find_map(|token| token.strip_prefix("+axis="))
        .map(|axis| {
            if axis.to_ascii_lowercase().starts_with("ne") {
                AxisOrder::LatLon
            } else {
                AxisOrder::XY
            }
        })
}

/// Axis order implied by the first `AXIS[...]` clause of a WKT string.
pub fn axis_order_from_wkt(wkt: &str) -> Option<AxisOrder> {
    let upper = wkt.to_ascii_uppercase();
    let start = upper.find("AXIS[")? + "AXIS[".len();
    let end = upper[start..].find(']')? + start;
    let clause = &upper[start..end];

    if clause.contains("NORTH") || clause.contains("LAT") {
        Some(AxisOrder::LatLon)
    } else if clause.contains("EAST") || clause.contains("LON") {
        Some(AxisOrder::XY)
    } else {
        None
    }
}
