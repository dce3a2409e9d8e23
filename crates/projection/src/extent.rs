//! Reprojection of bounding boxes.

use coverage_common::{ArrayDescriptor, SpatialBox};
use tracing::{debug, info};

use crate::definition::CrsDefinition;
use crate::error::{ProjectionError, ProjectionResult};
use crate::reprojector::Reprojector;

/// Reproject a box by transforming all four corners.
///
/// The result encloses the transformed corners. When the two CRS publish
/// their axes in different orders, x and y of the result are exchanged.
pub fn reproject_extent(
    reprojector: &dyn Reprojector,
    from: &CrsDefinition,
    to: &CrsDefinition,
    native: &SpatialBox,
) -> ProjectionResult<SpatialBox> {
    let corners = reprojector.reproject(from, to, &native.corners())?;
    let enclosing = SpatialBox::enclosing(&corners)
        .ok_or_else(|| ProjectionError::TransformFailed("no corners returned".to_string()))?;

    if from.axis_order != to.axis_order {
        Ok(enclosing.swapped())
    } else {
        Ok(enclosing)
    }
}

/// Same as [`reproject_extent`], degrading to the zero box on failure.
pub fn reproject_extent_or_zero(
    reprojector: &dyn Reprojector,
    from: &CrsDefinition,
    to: &CrsDefinition,
    native: &SpatialBox,
) -> SpatialBox {
    reproject_extent(reprojector, from, to, native).unwrap_or_else(|e| {
        info!(error = %e, "Cannot reproject extent, setting to (0,0,0,0)");
        SpatialBox::zero()
    })
}

/// WGS84 extent of a spatial array.
///
/// Successful results are memoized on the descriptor. Any failure, including
/// a non-spatial array or an unresolvable CRS, is logged and yields the zero
/// box without being memoized.
pub fn wgs84_extent(reprojector: &dyn Reprojector, array: &ArrayDescriptor) -> SpatialBox {
    let target = CrsDefinition::wgs84();
    let result = array.spatial_extent_wgs84(|srs, native| {
        let from = CrsDefinition::from_spatial_reference(srs)?;
        debug!(array = %array.name, crs = %srs.crs_code(), "Reprojecting extent to WGS84");
        Ok(reproject_extent(reprojector, &from, &target, native)?)
    });

    match result {
        Ok(extent) => extent,
        Err(e) => {
            info!(
                array = %array.name,
                error = %e,
                "Cannot derive spatial extent in WGS84, setting to (0,0,0,0)"
            );
            SpatialBox::zero()
        }
    }
}
