//! Output formats and resampling methods.

use coverage_common::{CoverageError, CoverageResult};
use serde::{Deserialize, Serialize};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    GeoTiff,
    Png,
    Jpeg,
    Gif,
    Bmp,
    NetCdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::GeoTiff,
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::Gif,
        OutputFormat::Bmp,
        OutputFormat::NetCdf,
    ];

    /// Parse a format name (case-insensitive).
    pub fn parse(s: &str) -> CoverageResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GEOTIFF" => Ok(OutputFormat::GeoTiff),
            "PNG" => Ok(OutputFormat::Png),
            "JPEG" => Ok(OutputFormat::Jpeg),
            "GIF" => Ok(OutputFormat::Gif),
            "BMP" => Ok(OutputFormat::Bmp),
            "NETCDF" => Ok(OutputFormat::NetCdf),
            _ => Err(CoverageError::invalid_parameter(
                "format",
                format!("unsupported format '{}'", s),
            )),
        }
    }

    /// Name used in requests.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::GeoTiff => "GeoTIFF",
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Gif => "GIF",
            OutputFormat::Bmp => "BMP",
            OutputFormat::NetCdf => "NetCDF",
        }
    }

    /// GDAL driver short name.
    pub fn driver(&self) -> &'static str {
        match self {
            OutputFormat::GeoTiff => "GTiff",
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Gif => "GIF",
            OutputFormat::Bmp => "BMP",
            OutputFormat::NetCdf => "netCDF",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::GeoTiff => "tif",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::NetCdf => "nc",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::GeoTiff => "image/tiff",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::NetCdf => "application/x-netcdf",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resampling method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    Nearest,
    Bilinear,
    Bicubic,
}

impl Interpolation {
    pub fn parse(s: &str) -> CoverageResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEAREST" => Ok(Interpolation::Nearest),
            "BILINEAR" => Ok(Interpolation::Bilinear),
            "BICUBIC" => Ok(Interpolation::Bicubic),
            _ => Err(CoverageError::invalid_parameter(
                "interpolation",
                format!("unsupported interpolation '{}'", s),
            )),
        }
    }

    /// Value of the `-r` option.
    pub fn resampling(&self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Bicubic => "cubic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(OutputFormat::parse("geotiff").unwrap(), OutputFormat::GeoTiff);
        assert_eq!(OutputFormat::parse("NetCDF").unwrap(), OutputFormat::NetCdf);
        assert!(OutputFormat::parse("webp").is_err());
    }

    #[test]
    fn test_every_format_parses_from_its_name() {
        for f in OutputFormat::ALL {
            assert_eq!(OutputFormat::parse(f.name()).unwrap(), f);
        }
    }

    #[test]
    fn test_netcdf_properties() {
        let f = OutputFormat::NetCdf;
        assert_eq!(f.driver(), "netCDF");
        assert_eq!(f.extension(), "nc");
        assert_eq!(f.mime_type(), "application/x-netcdf");
    }

    #[test]
    fn test_bicubic_maps_to_cubic() {
        assert_eq!(Interpolation::parse("BiCubic").unwrap().resampling(), "cubic");
        assert!(Interpolation::parse("lanczos").is_err());
    }
}
