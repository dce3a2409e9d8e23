//! Decoding of complete metadata rows and batches.

use md_parser::{decode_batch, decode_row, DecodeError, MetadataRow, WireField};
use test_utils::{
    arrays, attribute_group, dimension_group, extent_string, generate_rows, srs_string,
    trs_string, WireRow,
};

fn row(r: &WireRow) -> MetadataRow {
    MetadataRow::from(*r)
}

// ============================================================================
// Single rows
// ============================================================================

#[test]
fn test_spatiotemporal_array() {
    let a = decode_row(&row(&arrays::CHIRPS_DAILY)).unwrap();
    assert_eq!(a.name, "chirps_daily");
    assert_eq!(a.dimensions.len(), 3);
    assert_eq!(a.attributes.len(), 1);
    assert!(a.attributes[0].nullable);
    assert!(a.is_spatial());
    assert!(a.is_temporal());
    assert_eq!(a.x_dimension().unwrap().true_length(), 7200);
    assert_eq!(a.t_dimension().unwrap().true_max(), 364);

    let extent = a.extent.as_ref().unwrap();
    let spatial = extent.spatial.unwrap();
    assert_eq!((spatial.xmin, spatial.xmax), (-180.0, 180.0));
    assert_eq!(extent.temporal.as_ref().unwrap().tmin, "2001-01-01T00:00:00");
}

#[test]
fn test_dimension_order_is_preserved() {
    let a = decode_row(&row(&arrays::NDVI_MONTHLY)).unwrap();
    let names: Vec<&str> = a.dimensions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["col", "row", "t"]);
    assert!(a.extent.is_none());
    assert_eq!(a.srs.as_ref().unwrap().auth_id, 32632);
}

#[test]
fn test_plain_array() {
    let a = decode_row(&row(&arrays::PLAIN)).unwrap();
    assert!(!a.is_spatial());
    assert!(!a.is_temporal());
    assert!(a.extent.is_none());
}

#[test]
fn test_built_row() {
    let r = MetadataRow {
        name: "built".to_string(),
        dimensions: format!(
            "{}{}",
            dimension_group("x", 10, 20, 20, 0, 12, 25),
            dimension_group("y", 0, 5, 5, 1, 0, 4)
        ),
        attributes: attribute_group("v", "double", Some(false)),
        srs: srs_string("x", "y", "EPSG", 3857, "x0=0 y0=0 a11=10 a22=-10", "", ""),
        trs: trs_string("t", "2020-01-01", "PT6H"),
        extent: extent_string(Some((0.0, 200.0, -50.0, 0.0)), None),
    };

    let a = decode_row(&r).unwrap();
    let x = &a.dimensions[0];
    assert_eq!((x.min, x.max), (10, 29));
    assert_eq!((x.true_min(), x.true_max()), (12, 25));
    // trs refers to a dimension that does not exist
    assert!(a.t_dimension().is_none());
}

#[test]
fn test_broken_dimension_is_arity_error() {
    let err = decode_row(&row(&arrays::BROKEN_DIMENSIONS)).unwrap_err();
    assert!(err.is_arity());
    assert_eq!(err.field(), WireField::Dimensions);
}

#[test]
fn test_unterminated_attribute_group() {
    let mut r = row(&arrays::PLAIN);
    r.attributes = "<v;;;double".to_string();
    assert_eq!(
        decode_row(&r).unwrap_err(),
        DecodeError::UnterminatedGroup {
            field: WireField::Attributes
        }
    );
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_batch_skips_only_broken_rows() {
    let rows: Vec<MetadataRow> = arrays::ALL.iter().map(row).collect();
    let batch = decode_batch(&rows);

    let names: Vec<&str> = batch.arrays.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["chirps_daily", "ndvi_monthly", "plain"]);
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].0, "broken");
}

#[test]
fn test_batch_of_generated_rows() {
    let rows: Vec<MetadataRow> = generate_rows(25)
        .into_iter()
        .map(|[name, dimensions, attributes, srs, trs, extent]| MetadataRow {
            name,
            dimensions,
            attributes,
            srs,
            trs,
            extent,
        })
        .collect();
    let batch = decode_batch(&rows);
    assert_eq!(batch.arrays.len(), 25);
    assert!(batch.skipped.is_empty());
    assert_eq!(batch.arrays[24].x_dimension().unwrap().true_length(), 124);
}

#[test]
fn test_empty_batch() {
    let batch = decode_batch(&[]);
    assert!(batch.arrays.is_empty());
    assert!(batch.skipped.is_empty());
}
