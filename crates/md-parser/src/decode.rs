//! Decoding of metadata rows into array descriptors.

use coverage_common::{
    AffineTransform, ArrayDescriptor, Attribute, Dimension, Extent, SpatialBox, SpatialReference,
    TemporalBounds, TemporalReference,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DecodeError, DecodeResult, WireField};
use crate::wire::{groups, non_empty, parse_f64, parse_flag, parse_i64, split_exact, split_fields};

const DIMENSION_FIELDS: usize = 7;
const SRS_FIELDS: usize = 7;
/// Minimum SRS fields; the WKT and PROJ forms may be missing at the end.
const SRS_REQUIRED_FIELDS: usize = 5;
const TRS_FIELDS: usize = 3;
const EXTENT_FIELDS: usize = 6;

/// The raw metadata of one array as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub name: String,
    pub dimensions: String,
    pub attributes: String,
    pub srs: String,
    pub trs: String,
    pub extent: String,
}

impl<S: AsRef<str>> From<[S; 6]> for MetadataRow {
    /// Build a row from its fields in wire order.
    fn from(fields: [S; 6]) -> Self {
        let [name, dimensions, attributes, srs, trs, extent] = fields;
        Self {
            name: name.as_ref().to_string(),
            dimensions: dimensions.as_ref().to_string(),
            attributes: attributes.as_ref().to_string(),
            srs: srs.as_ref().to_string(),
            trs: trs.as_ref().to_string(),
            extent: extent.as_ref().to_string(),
        }
    }
}

/// Outcome of decoding a batch of rows.
#[derive(Debug, Default)]
pub struct DecodedBatch {
    pub arrays: Vec<ArrayDescriptor>,
    /// Names of the rows that were skipped, with the reason.
    pub skipped: Vec<(String, DecodeError)>,
}

/// Decode every row, skipping the ones that fail.
pub fn decode_batch(rows: &[MetadataRow]) -> DecodedBatch {
    let mut batch = DecodedBatch::default();
    for row in rows {
        match decode_row(row) {
            Ok(array) => batch.arrays.push(array),
            Err(e) => {
                warn!(array = %row.name, error = %e, "Cannot extract metadata, array will be ignored");
                batch.skipped.push((row.name.clone(), e));
            }
        }
    }
    batch
}

/// Decode the metadata of one array.
pub fn decode_row(row: &MetadataRow) -> DecodeResult<ArrayDescriptor> {
    let name = non_empty(&row.name).ok_or_else(|| DecodeError::scalar(WireField::Name, &row.name, "empty array name"))?;
    debug!(array = %name, dimensions = %row.dimensions, "Got dimension string");
    debug!(array = %name, attributes = %row.attributes, "Got attribute string");
    debug!(array = %name, srs = %row.srs, "Got SRS string");
    debug!(array = %name, trs = %row.trs, "Got TRS string");
    debug!(array = %name, extent = %row.extent, "Got extent string");

    let mut array = ArrayDescriptor::new(name);
    array.dimensions = decode_dimensions(&row.dimensions)?;
    array.attributes = decode_attributes(&row.attributes)?;
    array.srs = decode_srs(&row.srs)?;
    array.trs = decode_trs(&row.trs)?;
    array.extent = decode_extent(&row.extent, array.is_spatial(), array.is_temporal())?;
    Ok(array)
}

/// `[name;;;start;;;length;;;chunk;;;overlap;;;curMin;;;curMax]...`
pub fn decode_dimensions(s: &str) -> DecodeResult<Vec<Dimension>> {
    groups(s, '[', ']', WireField::Dimensions)?
        .into_iter()
        .map(decode_dimension)
        .collect()
}

fn decode_dimension(group: &str) -> DecodeResult<Dimension> {
    const F: WireField = WireField::Dimensions;
    let p = split_exact(group, DIMENSION_FIELDS, F)?;

    let name = non_empty(p[0]).ok_or_else(|| DecodeError::scalar(F, p[0], "empty dimension name"))?;
    let start = parse_i64(p[1], F)?;
    let length = parse_i64(p[2], F)?;
    let max = start
        .checked_add(length)
        .and_then(|v| v.checked_sub(1))
        .ok_or_else(|| DecodeError::scalar(F, p[2], "dimension range overflows"))?;

    Ok(Dimension {
        name: name.to_string(),
        min: start,
        max,
        chunk_size: parse_i64(p[3], F)?,
        overlap: parse_i64(p[4], F)?,
        cur_min: parse_i64(p[5], F)?,
        cur_max: parse_i64(p[6], F)?,
    })
}

/// `<name;;;type[;;;nullable]>...`
pub fn decode_attributes(s: &str) -> DecodeResult<Vec<Attribute>> {
    groups(s, '<', '>', WireField::Attributes)?
        .into_iter()
        .map(decode_attribute)
        .collect()
}

fn decode_attribute(group: &str) -> DecodeResult<Attribute> {
    const F: WireField = WireField::Attributes;
    let p = split_fields(group);
    if p.len() < 2 || p.len() > 3 {
        return Err(DecodeError::WrongArity {
            field: F,
            expected: if p.len() < 2 { 2 } else { 3 },
            found: p.len(),
        });
    }

    let name = non_empty(p[0]).ok_or_else(|| DecodeError::scalar(F, p[0], "empty attribute name"))?;
    let nullable = p.get(2).map(|v| parse_flag(v)).unwrap_or(false);
    Ok(Attribute::new(name, p[1].trim(), nullable))
}

/// `xdim;;;ydim;;;authName;;;authId;;;affine;;;wkt;;;proj4`, empty if not spatial.
pub fn decode_srs(s: &str) -> DecodeResult<Option<SpatialReference>> {
    const F: WireField = WireField::Srs;
    if s.trim().is_empty() {
        return Ok(None);
    }

    let p = split_fields(s);
    if p.len() < SRS_REQUIRED_FIELDS || p.len() > SRS_FIELDS {
        return Err(DecodeError::WrongArity {
            field: F,
            expected: SRS_FIELDS,
            found: p.len(),
        });
    }

    let xdim = non_empty(p[0]).ok_or_else(|| DecodeError::InvalidReference {
        field: F,
        reason: "missing x dimension".to_string(),
    })?;
    let ydim = non_empty(p[1]).ok_or_else(|| DecodeError::InvalidReference {
        field: F,
        reason: "missing y dimension".to_string(),
    })?;
    let auth_id: i32 = p[3]
        .trim()
        .parse()
        .map_err(|e| DecodeError::scalar(F, p[3], e))?;

    let mut srs = SpatialReference::new(xdim, ydim, p[2].trim(), auth_id, AffineTransform::parse(p[4]));
    srs.wkt = p.get(5).and_then(|v| non_empty(v)).map(str::to_string);
    srs.proj4 = p.get(6).and_then(|v| non_empty(v)).map(str::to_string);
    Ok(Some(srs))
}

/// `tdim;;;t0;;;period`, empty if not temporal.
pub fn decode_trs(s: &str) -> DecodeResult<Option<TemporalReference>> {
    const F: WireField = WireField::Trs;
    if s.trim().is_empty() {
        return Ok(None);
    }

    let p = split_exact(s, TRS_FIELDS, F)?;
    let tdim = non_empty(p[0]).ok_or_else(|| DecodeError::InvalidReference {
        field: F,
        reason: "missing time dimension".to_string(),
    })?;
    TemporalReference::parse(tdim, p[1], p[2])
        .map(Some)
        .map_err(|e| DecodeError::InvalidReference {
            field: F,
            reason: e.to_string(),
        })
}

/// `xmin;;;xmax;;;ymin;;;ymax;;;tmin;;;tmax`.
///
/// Fewer than six fields means no extent. Only the part matching the
/// array's kind is read: the box for spatial arrays, the instants for
/// temporal ones.
pub fn decode_extent(s: &str, spatial: bool, temporal: bool) -> DecodeResult<Option<Extent>> {
    const F: WireField = WireField::Extent;
    if s.is_empty() {
        return Ok(None);
    }

    let v = split_fields(s);
    if v.len() < EXTENT_FIELDS {
        return Ok(None);
    }
    if v.len() > EXTENT_FIELDS {
        return Err(DecodeError::WrongArity {
            field: F,
            expected: EXTENT_FIELDS,
            found: v.len(),
        });
    }

    let mut extent = Extent::default();
    if spatial {
        extent.spatial = Some(SpatialBox::new(
            parse_f64(v[0], F)?,
            parse_f64(v[1], F)?,
            parse_f64(v[2], F)?,
            parse_f64(v[3], F)?,
        ));
    }
    if temporal && (non_empty(v[4]).is_some() || non_empty(v[5]).is_some()) {
        extent.temporal = Some(TemporalBounds {
            tmin: v[4].trim().to_string(),
            tmax: v[5].trim().to_string(),
        });
    }

    Ok((!extent.is_empty()).then_some(extent))
}
