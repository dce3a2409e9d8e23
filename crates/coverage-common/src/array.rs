//! Array descriptors.
//!
//! An [`ArrayDescriptor`] aggregates everything known about one coverage:
//! its dimensions in backend column order, its attributes, and the optional
//! spatial reference, temporal reference and extent. Descriptors are built
//! field by field by the metadata decoder and are treated as immutable once
//! they are shared; derived lookups are memoized on first access.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::attribute::Attribute;
use crate::dimension::{Dimension, UNBOUNDED};
use crate::error::{CoverageError, CoverageResult};
use crate::extent::{Extent, SpatialBox};
use crate::spatial::SpatialReference;
use crate::temporal::TemporalReference;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArrayDescriptor {
    pub name: String,
    pub dimensions: Vec<Dimension>,
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srs: Option<SpatialReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trs: Option<TemporalReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,

    #[serde(skip)]
    x_index: OnceLock<Option<usize>>,
    #[serde(skip)]
    y_index: OnceLock<Option<usize>>,
    #[serde(skip)]
    t_index: OnceLock<Option<usize>>,
    #[serde(skip)]
    wgs84_extent: OnceLock<SpatialBox>,
}

impl ArrayDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_spatial(&self) -> bool {
        self.srs.is_some()
    }

    pub fn is_temporal(&self) -> bool {
        self.trs.is_some()
    }

    fn dimension_named(&self, slot: &OnceLock<Option<usize>>, name: Option<&str>) -> Option<&Dimension> {
        let index = slot.get_or_init(|| {
            let name = name?;
            self.dimensions.iter().position(|d| d.name == name)
        });
        index.and_then(|i| self.dimensions.get(i))
    }

    /// Dimension mapped to world x, if spatial.
    pub fn x_dimension(&self) -> Option<&Dimension> {
        let name = self.srs.as_ref().map(|s| s.xdim.as_str());
        self.dimension_named(&self.x_index, name)
    }

    /// Dimension mapped to world y, if spatial.
    pub fn y_dimension(&self) -> Option<&Dimension> {
        let name = self.srs.as_ref().map(|s| s.ydim.as_str());
        self.dimension_named(&self.y_index, name)
    }

    /// Dimension carrying the time axis, if temporal.
    pub fn t_dimension(&self) -> Option<&Dimension> {
        let name = self.trs.as_ref().map(|t| t.tdim.as_str());
        self.dimension_named(&self.t_index, name)
    }

    /// Spatial reference or a `NotSpatial` error.
    pub fn require_srs(&self) -> CoverageResult<&SpatialReference> {
        self.srs
            .as_ref()
            .ok_or_else(|| CoverageError::NotSpatial(self.name.clone()))
    }

    /// Temporal reference or a `NotTemporal` error.
    pub fn require_trs(&self) -> CoverageResult<&TemporalReference> {
        self.trs
            .as_ref()
            .ok_or_else(|| CoverageError::NotTemporal(self.name.clone()))
    }

    /// Spatial box in the native CRS.
    ///
    /// Uses the decoded extent when the backend reported one, otherwise maps
    /// the four corners of the x/y dimensions' true index bounds through the
    /// affine transform. The upper corners sit on the far edge of the last
    /// cell, so the box covers every populated cell.
    pub fn native_spatial_box(&self) -> CoverageResult<SpatialBox> {
        let srs = self.require_srs()?;
        if let Some(spatial) = self.extent.as_ref().and_then(|e| e.spatial) {
            return Ok(spatial);
        }

        let (x, y) = match (self.x_dimension(), self.y_dimension()) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(CoverageError::InternalError(format!(
                    "array '{}' references missing spatial dimensions '{}'/'{}'",
                    self.name, srs.xdim, srs.ydim
                )))
            }
        };

        let index_box = SpatialBox::new(
            x.true_min() as f64,
            (x.true_max() + 1) as f64,
            y.true_min() as f64,
            (y.true_max() + 1) as f64,
        );
        let corners = index_box.corners().map(|p| srs.affine.forward(p));
        SpatialBox::enclosing(&corners)
            .ok_or_else(|| CoverageError::InternalError("empty corner set".to_string()))
    }

    /// Extent in WGS84, memoized after the first successful computation.
    ///
    /// `reproject` receives the native spatial reference and box. A failure
    /// is returned as is and not memoized, so a later call retries.
    pub fn spatial_extent_wgs84<F>(&self, reproject: F) -> CoverageResult<SpatialBox>
    where
        F: FnOnce(&SpatialReference, &SpatialBox) -> CoverageResult<SpatialBox>,
    {
        if let Some(cached) = self.wgs84_extent.get() {
            return Ok(*cached);
        }
        let srs = self.require_srs()?;
        let native = self.native_spatial_box()?;
        let reprojected = reproject(srs, &native)?;
        Ok(*self.wgs84_extent.get_or_init(|| reprojected))
    }

    /// Memoized WGS84 extent, if one was computed.
    pub fn cached_wgs84_extent(&self) -> Option<SpatialBox> {
        self.wgs84_extent.get().copied()
    }
}

impl fmt::Display for ArrayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.name)?;
        for (i, a) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", a.name, a.type_id)?;
            if a.nullable {
                f.write_str(" null")?;
            }
        }
        f.write_str(">[")?;
        for (i, d) in self.dimensions.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}:", d.name, d.min)?;
            if d.max == UNBOUNDED {
                f.write_str("*")?;
            } else {
                write!(f, "{}", d.max)?;
            }
            write!(f, ",{},{}", d.chunk_size, d.overlap)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::AffineTransform;
    use crate::temporal::{parse_instant, Period};

    fn sample() -> ArrayDescriptor {
        let mut a = ArrayDescriptor::new("ndvi");
        a.dimensions = vec![
            Dimension::new("col", 0, 99).with_chunking(50, 0),
            Dimension::new("row", 0, 49).with_chunking(50, 0),
            Dimension::new("t", 0, UNBOUNDED)
                .with_current(0, 11)
                .with_chunking(1, 0),
        ];
        a.attributes = vec![
            Attribute::new("ndvi", "int16", true),
            Attribute::new("quality", "uint8", false),
        ];
        a.srs = Some(SpatialReference::new(
            "col",
            "row",
            "EPSG",
            4326,
            AffineTransform::scale(10.0, 50.0, 0.1, -0.1),
        ));
        a.trs = Some(TemporalReference::new(
            "t",
            parse_instant("2001-01-01").unwrap(),
            Period::months(1),
        ));
        a
    }

    #[test]
    fn test_dimension_lookups() {
        let a = sample();
        assert_eq!(a.x_dimension().unwrap().name, "col");
        assert_eq!(a.y_dimension().unwrap().name, "row");
        assert_eq!(a.t_dimension().unwrap().true_max(), 11);
        // memoized
        assert_eq!(a.x_dimension().unwrap().name, "col");
    }

    #[test]
    fn test_plain_array_has_no_derived_dimensions() {
        let mut a = ArrayDescriptor::new("plain");
        a.dimensions = vec![Dimension::new("i", 0, 9)];
        assert!(!a.is_spatial());
        assert!(!a.is_temporal());
        assert!(a.x_dimension().is_none());
        assert!(a.t_dimension().is_none());
        assert!(matches!(a.require_trs(), Err(CoverageError::NotTemporal(_))));
        assert!(matches!(a.native_spatial_box(), Err(CoverageError::NotSpatial(_))));
    }

    #[test]
    fn test_schema_display() {
        assert_eq!(
            sample().to_string(),
            "ndvi<ndvi:int16 null,quality:uint8>[col=0:99,50,0,row=0:49,50,0,t=0:*,1,0]"
        );
    }

    #[test]
    fn test_native_box_from_index_bounds() {
        let b = sample().native_spatial_box().unwrap();
        assert_eq!(b.xmin, 10.0);
        assert!((b.xmax - 20.0).abs() < 1e-9);
        assert!((b.ymin - 45.0).abs() < 1e-9);
        assert_eq!(b.ymax, 50.0);
    }

    #[test]
    fn test_native_box_prefers_decoded_extent() {
        let mut a = sample();
        let decoded = SpatialBox::new(1.0, 2.0, 3.0, 4.0);
        a.extent = Some(Extent {
            spatial: Some(decoded),
            temporal: None,
        });
        assert_eq!(a.native_spatial_box().unwrap(), decoded);
    }

    #[test]
    fn test_wgs84_extent_memoizes_success_only() {
        let a = sample();
        let failed = a.spatial_extent_wgs84(|_, _| Err(CoverageError::ProjectionError("boom".into())));
        assert!(failed.is_err());
        assert!(a.cached_wgs84_extent().is_none());

        let first = a.spatial_extent_wgs84(|_, b| Ok(*b)).unwrap();
        let second = a
            .spatial_extent_wgs84(|_, _| Ok(SpatialBox::zero()))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(a.cached_wgs84_extent(), Some(first));
    }
}
