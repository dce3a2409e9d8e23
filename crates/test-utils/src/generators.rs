//! Builders for metadata wire strings.
//!
//! These produce the exact text the array engine emits for one array so
//! decoder, transport and cache tests can assemble rows without repeating
//! separator bookkeeping.

/// Field separator used by the backend.
pub const SEP: &str = ";;;";

/// One `[...]` dimension group.
///
/// # Example
///
/// ```
/// use test_utils::dimension_group;
///
/// let g = dimension_group("x", 0, 100, 50, 0, 0, 99);
/// assert_eq!(g, "[x;;;0;;;100;;;50;;;0;;;0;;;99]");
/// ```
pub fn dimension_group(
    name: &str,
    start: i64,
    length: i64,
    chunk: i64,
    overlap: i64,
    cur_min: i64,
    cur_max: i64,
) -> String {
    format!(
        "[{name}{SEP}{start}{SEP}{length}{SEP}{chunk}{SEP}{overlap}{SEP}{cur_min}{SEP}{cur_max}]"
    )
}

/// A fully populated dimension `[0, length)` stored in a single chunk.
pub fn simple_dimension(name: &str, length: i64) -> String {
    dimension_group(name, 0, length, length, 0, 0, length - 1)
}

/// One `<...>` attribute group; `nullable: None` omits the flag.
pub fn attribute_group(name: &str, type_id: &str, nullable: Option<bool>) -> String {
    match nullable {
        Some(flag) => format!("<{name}{SEP}{type_id}{SEP}{flag}>"),
        None => format!("<{name}{SEP}{type_id}>"),
    }
}

/// Spatial reference record in backend field order (WKT before PROJ).
pub fn srs_string(
    xdim: &str,
    ydim: &str,
    auth_name: &str,
    auth_id: i32,
    affine: &str,
    wkt: &str,
    proj4: &str,
) -> String {
    [xdim, ydim, auth_name, &auth_id.to_string(), affine, wkt, proj4].join(SEP)
}

/// Temporal reference record.
pub fn trs_string(tdim: &str, t0: &str, period: &str) -> String {
    [tdim, t0, period].join(SEP)
}

/// Extent record; `None` leaves the corresponding part empty.
pub fn extent_string(spatial: Option<(f64, f64, f64, f64)>, temporal: Option<(&str, &str)>) -> String {
    let mut fields: Vec<String> = match spatial {
        Some((xmin, xmax, ymin, ymax)) => vec![
            xmin.to_string(),
            xmax.to_string(),
            ymin.to_string(),
            ymax.to_string(),
        ],
        None => vec![String::new(); 4],
    };
    match temporal {
        Some((tmin, tmax)) => {
            fields.push(tmin.to_string());
            fields.push(tmax.to_string());
        }
        None => fields.extend([String::new(), String::new()]),
    }
    fields.join(SEP)
}

/// Render one row the way the HTTP shim streams it: every field single
/// quoted, quotes and backslashes escaped, fields joined by commas.
pub fn csv_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| format!("'{}'", f.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(",")
}

/// `n` well-formed spatial rows named `array_0`, `array_1`, ...
///
/// Each row is `[name, dimensions, attributes, srs, trs, extent]`.
pub fn generate_rows(n: usize) -> Vec<[String; 6]> {
    (0..n)
        .map(|i| {
            let size = 100 + i as i64;
            [
                format!("array_{}", i),
                format!("{}{}", simple_dimension("x", size), simple_dimension("y", size)),
                format!(
                    "{}{}",
                    attribute_group("band1", "int16", Some(true)),
                    attribute_group("band2", "double", None)
                ),
                srs_string(
                    "x",
                    "y",
                    "EPSG",
                    4326,
                    &format!("x0={} y0=60 a11=0.01 a22=-0.01", -10.0 + i as f64),
                    "",
                    "+proj=longlat +datum=WGS84 +no_defs",
                ),
                String::new(),
                String::new(),
            ]
        })
        .collect()
}
