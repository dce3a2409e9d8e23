//! End-to-end: request, resolution against decoded metadata, tool arguments.

use coverage_common::{ArrayDescriptor, CoverageError};
use md_parser::{decode_row, MetadataRow};
use raster_extract::{
    resolve, ExtractionRequest, Interpolation, OutputFormat, TranslateCommand, TranslateConfig,
};
use scidb_client::ShimConfig;
use test_utils::{arrays, WireRow};
use uuid::Uuid;

fn array(row: WireRow) -> ArrayDescriptor {
    decode_row(&MetadataRow::from(row)).unwrap()
}

fn shim() -> ShimConfig {
    ShimConfig {
        host: "db.local".to_string(),
        port: 8083,
        user: "reader".to_string(),
        password: "secret".to_string(),
        ssl: false,
        ..Default::default()
    }
}

#[test]
fn test_projected_daily_subset() {
    let chirps = array(arrays::CHIRPS_DAILY);
    let req = ExtractionRequest::new("chirps_daily", "EPSG:4326", OutputFormat::GeoTiff)
        .with_bbox(-10.0, 30.0, 10.0, 40.0)
        .with_time("2001-02-01T00:00:00Z")
        .with_size(400, 200)
        .with_interpolation(Interpolation::Bicubic);

    let resolved = resolve(&req, &chirps).unwrap();
    assert_eq!(resolved.time_index, Some(31));

    let tmp = tempfile::tempdir().unwrap();
    let config = TranslateConfig {
        gdal_path: Some(tmp.path().join("bin")),
        temp_path: tmp.path().to_path_buf(),
    };
    let id = Uuid::nil();
    let cmd = TranslateCommand::with_request_id(&resolved, &config, &shim(), id);

    assert_eq!(cmd.program, tmp.path().join("bin").join("gdal_translate"));
    assert_eq!(cmd.output, tmp.path().join(format!("{}.tif", id)));
    assert_eq!(
        cmd.args,
        vec![
            "-outsize".to_string(),
            "400".to_string(),
            "200".to_string(),
            "-projwin".to_string(),
            "-10".to_string(),
            "40".to_string(),
            "10".to_string(),
            "30".to_string(),
            "-projwin_srs".to_string(),
            "EPSG:4326".to_string(),
            "-oo".to_string(),
            "t=31".to_string(),
            "-of".to_string(),
            "GTiff".to_string(),
            "-r".to_string(),
            "cubic".to_string(),
            "SCIDB:array=chirps_daily host=http://db.local port=8083 user=reader password=secret"
                .to_string(),
            cmd.output.display().to_string(),
        ]
    );
    assert_eq!(cmd.command_line().len(), cmd.args.len() + 1);
}

#[test]
fn test_pixel_window_with_resolution() {
    let plain = array(arrays::PLAIN);
    let req = ExtractionRequest::new("plain", "image", OutputFormat::NetCdf)
        .with_bbox(0.0, 0.0, 5.0, 1.0)
        .with_resolution(1.0, 1.0);

    let resolved = resolve(&req, &plain).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let config = TranslateConfig {
        gdal_path: None,
        temp_path: tmp.path().to_path_buf(),
    };
    assert!(config.validate().is_ok());

    let cmd = TranslateCommand::new(&resolved, &config, &shim());
    assert_eq!(cmd.program.to_str(), Some("gdal_translate"));
    assert_eq!(&cmd.args[..3], ["-tr", "1", "1"]);
    assert_eq!(&cmd.args[3..8], ["-srcwin", "0", "0", "5", "1"]);
    assert!(cmd.output.to_string_lossy().ends_with(".nc"));
    assert!(!cmd.args.contains(&"-oo".to_string()));
}

#[test]
fn test_request_ids_are_unique() {
    let plain = array(arrays::PLAIN);
    let req = ExtractionRequest::new("plain", "IMAGE", OutputFormat::Png)
        .with_bbox(0.0, 0.0, 1.0, 1.0)
        .with_size(1, 1);
    let resolved = resolve(&req, &plain).unwrap();
    let config = TranslateConfig::default();

    let a = TranslateCommand::new(&resolved, &config, &shim());
    let b = TranslateCommand::new(&resolved, &config, &shim());
    assert_ne!(a.request_id, b.request_id);
    assert_ne!(a.output, b.output);
}

#[test]
fn test_time_outside_axis_is_rejected() {
    let chirps = array(arrays::CHIRPS_DAILY);
    let req = ExtractionRequest::new("chirps_daily", "EPSG:4326", OutputFormat::Png)
        .with_time("2002-01-01")
        .with_size(10, 10);
    let err = resolve(&req, &chirps).unwrap_err();
    assert!(matches!(
        err,
        CoverageError::TimeOutOfRange {
            index: 365,
            min: 0,
            max: 364
        }
    ));
    assert_eq!(err.exception_code(), "InvalidParameterValue");
}

#[test]
fn test_monthly_axis_uses_current_bounds() {
    let ndvi = array(arrays::NDVI_MONTHLY);
    let req = ExtractionRequest::new("ndvi_monthly", "EPSG:32632", OutputFormat::GeoTiff)
        .with_time("2016-12-15")
        .with_size(10, 10);
    assert_eq!(resolve(&req, &ndvi).unwrap().time_index, Some(23));

    let req = req.with_time("2017-01-01");
    assert!(matches!(
        resolve(&req, &ndvi),
        Err(CoverageError::TimeOutOfRange { index: 24, .. })
    ));
}

#[test]
fn test_time_on_plain_array_is_invalid() {
    let plain = array(arrays::PLAIN);
    let req = ExtractionRequest::new("plain", "IMAGE", OutputFormat::Png)
        .with_time("2001-01-01")
        .with_size(10, 10);
    assert!(matches!(
        resolve(&req, &plain),
        Err(CoverageError::InvalidParameter { param, .. }) if param == "time"
    ));
}

#[test]
fn test_time_ranges_and_lists_are_invalid() {
    let chirps = array(arrays::CHIRPS_DAILY);
    for time in ["2001-01-01/2001-02-01", "2001-01-01,2001-01-02"] {
        let req = ExtractionRequest::new("chirps_daily", "EPSG:4326", OutputFormat::Png)
            .with_time(time)
            .with_size(10, 10);
        assert!(matches!(
            resolve(&req, &chirps),
            Err(CoverageError::InvalidParameter { .. })
        ));
    }
}

#[test]
fn test_bbox_or_time_required() {
    let plain = array(arrays::PLAIN);
    let req = ExtractionRequest::new("plain", "IMAGE", OutputFormat::Png).with_size(10, 10);
    assert!(resolve(&req, &plain).is_err());
}
