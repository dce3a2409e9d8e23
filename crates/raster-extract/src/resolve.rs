//! Resolution of a request against the coverage's metadata.

use coverage_common::{parse_instant, ArrayDescriptor, CoverageError, CoverageResult};
use serde::Serialize;
use tracing::debug;

use crate::format::{Interpolation, OutputFormat};
use crate::request::ExtractionRequest;

/// Source window of the extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Window {
    /// Pixel offsets and sizes, rounded to whole cells.
    Pixel {
        xoff: i64,
        yoff: i64,
        xsize: i64,
        ysize: i64,
    },
    /// Map-coordinate window given by its upper-left and lower-right corners.
    Projected {
        ulx: f64,
        uly: f64,
        lrx: f64,
        lry: f64,
        srs: String,
    },
}

/// Requested output geometry. At least one part is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputGeometry {
    pub resolution: Option<(f64, f64)>,
    pub size: Option<(u32, u32)>,
}

/// Everything the downstream raster tool needs for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedExtraction {
    pub coverage: String,
    pub window: Option<Window>,
    pub time_index: Option<i64>,
    pub geometry: OutputGeometry,
    pub format: OutputFormat,
    pub interpolation: Option<Interpolation>,
}

/// Validate `req` against `array` and resolve its time to an index.
pub fn resolve(req: &ExtractionRequest, array: &ArrayDescriptor) -> CoverageResult<ResolvedExtraction> {
    if req.crs.trim().is_empty() {
        return Err(CoverageError::invalid_parameter("crs", "missing parameter"));
    }
    if req.bbox.is_none() && req.time.is_none() {
        return Err(CoverageError::invalid_parameter(
            "bbox",
            "either a bounding box or a time must be given",
        ));
    }

    let window = req.bbox.map(|b| window_for(req, b)).transpose()?;
    let time_index = req
        .time
        .as_deref()
        .map(|t| resolve_time(array, t))
        .transpose()?;
    let geometry = output_geometry(req)?;

    debug!(
        coverage = %req.coverage,
        time_index = ?time_index,
        format = %req.format,
        "Resolved extraction request"
    );

    Ok(ResolvedExtraction {
        coverage: req.coverage.clone(),
        window,
        time_index,
        geometry,
        format: req.format,
        interpolation: req.interpolation,
    })
}

fn window_for(req: &ExtractionRequest, [xmin, ymin, xmax, ymax]: [f64; 4]) -> CoverageResult<Window> {
    if [xmin, ymin, xmax, ymax].iter().any(|v| !v.is_finite()) || xmax < xmin || ymax < ymin {
        return Err(CoverageError::invalid_parameter(
            "bbox",
            format!("invalid box {},{},{},{}", xmin, ymin, xmax, ymax),
        ));
    }

    if req.is_image_crs() {
        Ok(Window::Pixel {
            xoff: xmin.round() as i64,
            yoff: ymin.round() as i64,
            xsize: (xmax - xmin).round() as i64,
            ysize: (ymax - ymin).round() as i64,
        })
    } else {
        Ok(Window::Projected {
            ulx: xmin,
            uly: ymax,
            lrx: xmax,
            lry: ymin,
            srs: req.crs.clone(),
        })
    }
}

/// Index of a single instant on the array's time axis.
pub fn resolve_time(array: &ArrayDescriptor, time: &str) -> CoverageResult<i64> {
    if !array.is_temporal() {
        return Err(CoverageError::invalid_parameter(
            "time",
            format!(
                "array '{}' has no temporal reference but a time is given",
                array.name
            ),
        ));
    }
    if time.contains(',') {
        return Err(CoverageError::invalid_parameter(
            "time",
            "only a single time value is accepted",
        ));
    }
    if time.contains('/') {
        return Err(CoverageError::invalid_parameter(
            "time",
            "time periods start/end/resolution are not supported",
        ));
    }

    let trs = array.require_trs()?;
    let tdim = array
        .t_dimension()
        .ok_or_else(|| CoverageError::NotTemporal(array.name.clone()))?;
    let instant = parse_instant(time)?;
    let index = trs.index_at_instant(&instant)?;
    trs.validate_index(index, tdim)?;
    Ok(index)
}

fn output_geometry(req: &ExtractionRequest) -> CoverageResult<OutputGeometry> {
    let resolution = match (req.resx, req.resy) {
        (Some(x), Some(y)) if x > 0.0 && y > 0.0 => Some((x, y)),
        _ => None,
    };
    let size = match (req.width, req.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    };
    if resolution.is_none() && size.is_none() {
        return Err(CoverageError::invalid_parameter(
            "width",
            "either a positive resolution or a positive output size is required",
        ));
    }
    Ok(OutputGeometry { resolution, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_geometry_requires_one_part() {
        let req = ExtractionRequest::new("a", "IMAGE", OutputFormat::Png).with_bbox(0.0, 0.0, 1.0, 1.0);
        assert!(output_geometry(&req).is_err());

        let req = req.with_resolution(0.0, 1.0);
        assert!(output_geometry(&req).is_err());

        let req = req.with_size(10, 20);
        let g = output_geometry(&req).unwrap();
        assert_eq!(g.size, Some((10, 20)));
        assert_eq!(g.resolution, None);
    }

    #[test]
    fn test_pixel_window_is_rounded() {
        let req = ExtractionRequest::new("a", "image", OutputFormat::Png);
        let w = window_for(&req, [10.4, 20.6, 110.5, 70.6]).unwrap();
        assert_eq!(
            w,
            Window::Pixel {
                xoff: 10,
                yoff: 21,
                xsize: 100,
                ysize: 50
            }
        );
    }

    #[test]
    fn test_projected_window_corners() {
        let req = ExtractionRequest::new("a", "EPSG:4326", OutputFormat::Png);
        let w = window_for(&req, [-10.0, 30.0, 10.0, 40.0]).unwrap();
        assert_eq!(
            w,
            Window::Projected {
                ulx: -10.0,
                uly: 40.0,
                lrx: 10.0,
                lry: 30.0,
                srs: "EPSG:4326".to_string()
            }
        );
    }

    #[test]
    fn test_inverted_box_rejected() {
        let req = ExtractionRequest::new("a", "EPSG:4326", OutputFormat::Png);
        assert!(window_for(&req, [10.0, 0.0, -10.0, 1.0]).is_err());
        assert!(window_for(&req, [f64::NAN, 0.0, 1.0, 1.0]).is_err());
    }
}
