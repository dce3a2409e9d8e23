//! Subcommand implementations. Each returns the text to print.

use anyhow::Result;
use coverage_common::{
    format_instant, parse_instant, ArrayDescriptor, CoverageError, CoverageResult,
};
use metadata_cache::ArrayMetadataCache;
use projection::{wgs84_extent, Reprojector};
use raster_extract::{
    resolve, ExtractionRequest, Interpolation, OutputFormat, TranslateCommand, TranslateConfig,
};
use scidb_client::ShimConfig;
use serde_json::json;

/// One schema line per array.
pub async fn list(cache: &ArrayMetadataCache) -> Result<String> {
    let arrays = cache.get_many(&[]).await?;
    Ok(arrays
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Descriptor and WGS84 extent as pretty JSON.
pub async fn describe(
    cache: &ArrayMetadataCache,
    reprojector: &dyn Reprojector,
    name: &str,
) -> Result<String> {
    let array = cache.get(name).await?;
    let extent = array.is_spatial().then(|| wgs84_extent(reprojector, &array));
    let doc = json!({
        "schema": array.to_string(),
        "descriptor": &*array,
        "wgs84_extent": extent,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Index of the cell containing `instant` on the array's time axis.
pub async fn time_index(cache: &ArrayMetadataCache, name: &str, instant: &str) -> Result<String> {
    let array = cache.get(name).await?;
    let trs = array.require_trs()?;
    let t = parse_instant(instant)?;
    let index = trs.index_at_instant(&t)?;
    check_time_index(&array, index)?;
    Ok(index.to_string())
}

/// Instant at which cell `index` of the time axis starts.
pub async fn instant(cache: &ArrayMetadataCache, name: &str, index: i64) -> Result<String> {
    let array = cache.get(name).await?;
    let trs = array.require_trs()?;
    check_time_index(&array, index)?;
    let t = trs.instant_at_index(index)?;
    Ok(format_instant(&t))
}

/// Reject indices outside the populated time axis.
fn check_time_index(array: &ArrayDescriptor, index: i64) -> CoverageResult<()> {
    let trs = array.require_trs()?;
    let tdim = array.t_dimension().ok_or_else(|| {
        CoverageError::InternalError(format!(
            "array '{}' references missing time dimension '{}'",
            array.name, trs.tdim
        ))
    })?;
    trs.validate_index(index, tdim)
}

/// Parameters of a `translate-args` invocation.
#[derive(Debug, Clone, Default)]
pub struct TranslateParams {
    pub crs: String,
    pub bbox: Option<String>,
    pub time: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resx: Option<f64>,
    pub resy: Option<f64>,
    pub format: String,
    pub interpolation: Option<String>,
}

/// The tool command line for a subset of `name`.
pub async fn translate_args(
    cache: &ArrayMetadataCache,
    shim: &ShimConfig,
    translate: &TranslateConfig,
    name: &str,
    params: &TranslateParams,
) -> Result<TranslateCommand> {
    let mut req = ExtractionRequest::new(name, &params.crs, OutputFormat::parse(&params.format)?);
    if let Some(bbox) = &params.bbox {
        let parsed = coverage_common::SpatialBox::from_bbox_string(bbox)?;
        req = req.with_bbox(parsed.xmin, parsed.ymin, parsed.xmax, parsed.ymax);
    }
    req.time = params.time.clone();
    req.width = params.width;
    req.height = params.height;
    req.resx = params.resx;
    req.resy = params.resy;
    req.interpolation = params
        .interpolation
        .as_deref()
        .map(Interpolation::parse)
        .transpose()?;

    let array = cache.get(name).await?;
    let resolved = resolve(&req, &array)?;
    Ok(TranslateCommand::new(&resolved, translate, shim))
}

/// Render a command line with arguments containing spaces single-quoted.
pub fn shell_line(args: &[String]) -> String {
    args.iter()
        .map(|a| {
            if a.contains(' ') || a.contains('\'') || a.is_empty() {
                format!("'{}'", a.replace('\'', r"'\''"))
            } else {
                a.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Process exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CoverageError>() {
        Some(e) if e.is_client_error() => 2,
        Some(CoverageError::MetadataUnavailable(_)) => 3,
        _ => 1,
    }
}
