//! Coverage subset requests.

use serde::{Deserialize, Serialize};

use crate::format::{Interpolation, OutputFormat};

/// Subset CRS that selects a pixel window instead of map coordinates.
pub const IMAGE_CRS: &str = "IMAGE";

/// A raster subset of one coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub coverage: String,

    /// CRS of `bbox`, e.g. `EPSG:4326`, or `IMAGE` for pixel coordinates.
    pub crs: String,

    /// `[xmin, ymin, xmax, ymax]`; the whole coverage when absent.
    pub bbox: Option<[f64; 4]>,

    /// Raw TIME value, a single ISO-8601 instant.
    pub time: Option<String>,

    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resx: Option<f64>,
    pub resy: Option<f64>,

    pub format: OutputFormat,
    pub interpolation: Option<Interpolation>,
}

impl ExtractionRequest {
    pub fn new(coverage: impl Into<String>, crs: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            coverage: coverage.into(),
            crs: crs.into(),
            bbox: None,
            time: None,
            width: None,
            height: None,
            resx: None,
            resy: None,
            format,
            interpolation: None,
        }
    }

    pub fn with_bbox(mut self, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        self.bbox = Some([xmin, ymin, xmax, ymax]);
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_resolution(mut self, resx: f64, resy: f64) -> Self {
        self.resx = Some(resx);
        self.resy = Some(resy);
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = Some(interpolation);
        self
    }

    pub fn is_image_crs(&self) -> bool {
        self.crs.eq_ignore_ascii_case(IMAGE_CRS)
    }
}
