//! Common test fixtures for coverage metadata tests.
//!
//! Sample arrays are given as raw wire rows
//! `[name, dimensions, attributes, srs, trs, extent]`, exactly as the
//! backend delivers them.

/// A wire row: name, dimensions, attributes, srs, trs, extent.
pub type WireRow = [&'static str; 6];

/// Bounding boxes `(xmin, xmax, ymin, ymax)`.
pub mod bbox {
    /// Global longitude/latitude box.
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, 180.0, -90.0, 90.0);

    /// A 30 km square in UTM zone 32N (metres).
    pub const UTM32_TILE: (f64, f64, f64, f64) = (500_000.0, 530_000.0, 5_500_000.0, 5_530_000.0);

    /// Degenerate box returned when reprojection fails.
    pub const ZERO: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.0);
}

/// Sample arrays in wire form.
pub mod arrays {
    use super::WireRow;

    /// Daily precipitation, global 0.05 degree grid, one year of days.
    pub const CHIRPS_DAILY: WireRow = [
        "chirps_daily",
        "[lon;;;0;;;7200;;;256;;;0;;;0;;;7199][lat;;;0;;;2000;;;256;;;0;;;0;;;1999][t;;;0;;;365;;;1;;;0;;;0;;;364]",
        "<precip;;;float;;;true>",
        "lon;;;lat;;;EPSG;;;4326;;;x0=-180 y0=50 a11=0.05 a22=-0.05 a12=0 a21=0;;;;;;+proj=longlat +datum=WGS84 +no_defs",
        "t;;;2001-01-01T00:00:00;;;P1D",
        "-180;;;180;;;-50;;;50;;;2001-01-01T00:00:00;;;2001-12-31T00:00:00",
    ];

    /// Monthly NDVI composites in UTM 32N without a decoded extent.
    pub const NDVI_MONTHLY: WireRow = [
        "ndvi_monthly",
        "[col;;;0;;;1000;;;500;;;0;;;0;;;999][row;;;0;;;1000;;;500;;;0;;;0;;;999][t;;;0;;;4611686018427387903;;;1;;;0;;;0;;;23]",
        "<ndvi;;;int16;;;true><quality;;;uint8>",
        "col;;;row;;;EPSG;;;32632;;;x0=500000 y0=5530000 a11=30 a22=-30;;;;;;+proj=utm +zone=32 +datum=WGS84 +units=m +no_defs",
        "t;;;2015-01-01;;;P1M",
        "",
    ];

    /// A plain array with neither spatial nor temporal reference.
    pub const PLAIN: WireRow = [
        "plain",
        "[i;;;0;;;10;;;10;;;0;;;0;;;9]",
        "<v;;;double>",
        "",
        "",
        "",
    ];

    /// Second dimension group is missing its current-maximum field.
    pub const BROKEN_DIMENSIONS: WireRow = [
        "broken",
        "[x;;;0;;;10;;;10;;;0;;;0;;;9][y;;;0;;;10;;;10;;;0;;;0]",
        "<v;;;double>",
        "",
        "",
        "",
    ];

    /// Every sample, well-formed or not.
    pub const ALL: [WireRow; 4] = [CHIRPS_DAILY, NDVI_MONTHLY, PLAIN, BROKEN_DIMENSIONS];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_names_unique() {
        let mut names: Vec<&str> = arrays::ALL.iter().map(|r| r[0]).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), arrays::ALL.len());
    }
}
