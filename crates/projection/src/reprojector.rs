//! Point reprojection between two CRS definitions.

use coverage_common::Point2;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::definition::CrsDefinition;
use crate::error::{ProjectionError, ProjectionResult};

/// Reprojects points from one CRS to another.
///
/// Implementations are treated as black boxes; points are given and
/// returned in the CRS's native x/y sense (easting or longitude first).
pub trait Reprojector: Send + Sync {
    fn reproject(
        &self,
        from: &CrsDefinition,
        to: &CrsDefinition,
        points: &[Point2],
    ) -> ProjectionResult<Vec<Point2>>;
}

/// Reprojector backed by the pure-Rust proj4rs port.
///
/// Geographic coordinates are exchanged in degrees.
#[derive(Debug, Default, Clone, Copy)]
pub struct Proj4Reprojector;

impl Proj4Reprojector {
    pub fn new() -> Self {
        Self
    }
}

fn build(def: &CrsDefinition) -> ProjectionResult<Proj> {
    Proj::from_proj_string(&def.proj4).map_err(|e| ProjectionError::InvalidDefinition {
        definition: def.proj4.clone(),
        reason: format!("{:?}", e),
    })
}

impl Reprojector for Proj4Reprojector {
    fn reproject(
        &self,
        from: &CrsDefinition,
        to: &CrsDefinition,
        points: &[Point2],
    ) -> ProjectionResult<Vec<Point2>> {
        let source = build(from)?;
        let target = build(to)?;
        let (source_geographic, target_geographic) = (from.is_geographic(), to.is_geographic());

        points
            .iter()
            .map(|p| {
                let mut point = if source_geographic {
                    (p.x.to_radians(), p.y.to_radians(), 0.0)
                } else {
                    (p.x, p.y, 0.0)
                };

                transform(&source, &target, &mut point)
                    .map_err(|e| ProjectionError::TransformFailed(format!("{:?}", e)))?;

                let out = if target_geographic {
                    Point2::new(point.0.to_degrees(), point.1.to_degrees())
                } else {
                    Point2::new(point.0, point.1)
                };
                if !out.x.is_finite() || !out.y.is_finite() {
                    return Err(ProjectionError::TransformFailed(format!(
                        "non-finite result for ({}, {})",
                        p.x, p.y
                    )));
                }
                Ok(out)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_coords_approx_eq;

    #[test]
    fn test_utm_to_wgs84() {
        let utm = CrsDefinition::from_epsg(32632).unwrap();
        let out = Proj4Reprojector
            .reproject(&utm, &CrsDefinition::wgs84(), &[Point2::new(500_000.0, 0.0)])
            .unwrap();
        // Central meridian of zone 32 on the equator
        assert_coords_approx_eq!((out[0].x, out[0].y), (9.0, 0.0), 1e-6);
    }

    #[test]
    fn test_wgs84_to_mercator_and_back() {
        let merc = CrsDefinition::from_epsg(3857).unwrap();
        let wgs = CrsDefinition::wgs84();
        let p = [Point2::new(10.0, 50.0)];
        let there = Proj4Reprojector.reproject(&wgs, &merc, &p).unwrap();
        assert!((there[0].x - 1_113_194.9).abs() < 1.0);
        let back = Proj4Reprojector.reproject(&merc, &wgs, &there).unwrap();
        assert_coords_approx_eq!((back[0].x, back[0].y), (10.0, 50.0), 1e-7);
    }

    #[test]
    fn test_invalid_definition() {
        let bad = CrsDefinition::from_proj4("+proj=doesnotexist");
        let err = Proj4Reprojector
            .reproject(&bad, &CrsDefinition::wgs84(), &[Point2::new(0.0, 0.0)])
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidDefinition { .. }));
    }
}
