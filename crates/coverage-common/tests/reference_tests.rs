//! Integration tests for affine and temporal references working together
//! with array descriptors.

use chrono::Duration;
use coverage_common::{
    parse_instant, AffineTransform, ArrayDescriptor, CoverageError, Dimension, Period, Point2,
    SpatialReference, TemporalReference,
};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};

// ============================================================================
// Affine textual form
// ============================================================================

#[test]
fn test_format_parse_round_trip_many() {
    let samples = [
        AffineTransform::identity(),
        AffineTransform::new(-180.0, 90.0, 0.25, 0.0, 0.0, -0.25),
        AffineTransform::new(1e-9, -1e9, 123.456, -7.5e-3, 2.25e-5, -0.001),
        AffineTransform::new(694_022.5, 9_413_727.5, 231.656358, 0.0, 0.0, -231.656358),
    ];
    for t in &samples {
        let back: AffineTransform = t.format().parse().unwrap();
        assert_approx_eq!(t.x0(), back.x0(), 1e-10);
        assert_approx_eq!(t.y0(), back.y0(), 1e-10);
        assert_approx_eq!(t.a11(), back.a11(), 1e-10);
        assert_approx_eq!(t.a12(), back.a12(), 1e-10);
        assert_approx_eq!(t.a21(), back.a21(), 1e-10);
        assert_approx_eq!(t.a22(), back.a22(), 1e-10);
    }
}

#[test]
fn test_inverse_maps_world_back_to_pixels() {
    let t = AffineTransform::parse("x0=-180 y0=90 a11=0.25 a22=-0.25");
    let pixel = t.inverse(Point2::new(-179.875, 89.875)).unwrap();
    assert_coords_approx_eq!((pixel.x, pixel.y), (0.5, 0.5), 1e-12);

    let mut out = Point2::default();
    t.inverse_into(&Point2::new(0.0, 0.0), &mut out).unwrap();
    assert_coords_approx_eq!((out.x, out.y), (720.0, 360.0), 1e-9);
}

#[test]
fn test_all_zero_linear_part_is_ill_conditioned() {
    let t = AffineTransform::parse("x0=3 y0=4 a11=0 a22=0");
    match t.inverse(Point2::new(3.0, 4.0)) {
        Err(CoverageError::IllConditionedTransform { determinant }) => assert_eq!(determinant, 0.0),
        other => panic!("expected ill-conditioned error, got {:?}", other),
    }
}

// ============================================================================
// Temporal axis against its dimension
// ============================================================================

#[test]
fn test_resolve_and_validate_time_index() {
    let mut array = ArrayDescriptor::new("chirps");
    array.dimensions = vec![
        Dimension::new("lon", 0, 7199),
        Dimension::new("lat", 0, 1999),
        Dimension::new("t", 0, 364),
    ];
    array.trs = Some(TemporalReference::parse("t", "2001-01-01T00:00:00", "P1D").unwrap());

    let trs = array.require_trs().unwrap();
    let tdim = array.t_dimension().unwrap();

    let i = trs
        .index_at_instant(&parse_instant("2001-03-01T12:00:00").unwrap())
        .unwrap();
    assert_eq!(i, 59);
    assert!(trs.validate_index(i, tdim).is_ok());

    let late = trs
        .index_at_instant(&parse_instant("2002-06-01").unwrap())
        .unwrap();
    let err = trs.validate_index(late, tdim).unwrap_err();
    assert_eq!(err.exception_code(), "InvalidParameterValue");
}

#[test]
fn test_sixteen_day_composites() {
    let trs = TemporalReference::new(
        "t",
        parse_instant("2000-02-18").unwrap(),
        Period::days(16),
    );
    let t = parse_instant("2000-03-05").unwrap();
    assert_eq!(trs.index_at_instant(&t).unwrap(), 1);
    let just_before = t - Duration::milliseconds(1);
    assert_eq!(trs.index_at_instant(&just_before).unwrap(), 0);
}

// ============================================================================
// Spatial descriptors
// ============================================================================

#[test]
fn test_descriptor_json_has_no_memo_fields() {
    let mut array = ArrayDescriptor::new("srtm");
    array.dimensions = vec![Dimension::new("x", 0, 9), Dimension::new("y", 0, 9)];
    array.srs = Some(SpatialReference::new(
        "x",
        "y",
        "EPSG",
        4326,
        AffineTransform::scale(0.0, 10.0, 1.0, -1.0),
    ));
    let _ = array.x_dimension();

    let json = serde_json::to_value(&array).unwrap();
    assert_eq!(json["name"], "srtm");
    assert_eq!(json["srs"]["auth_id"], 4326);
    assert!(json.get("x_index").is_none());
    assert!(json.get("trs").is_none());
}
