//! Downstream raster extraction.
//!
//! A coverage subset request is resolved against the array's metadata
//! (pixel or map window, time instant to axis index, output geometry) and
//! rendered as the argument vector of the raster translation tool, which
//! reads the array straight from the backend. Running the tool is left to
//! the caller.

pub mod format;
pub mod request;
pub mod resolve;
pub mod translate;

pub use format::{Interpolation, OutputFormat};
pub use request::{ExtractionRequest, IMAGE_CRS};
pub use resolve::{resolve, resolve_time, OutputGeometry, ResolvedExtraction, Window};
pub use translate::{
    connection_string, output_path, translate_args, TranslateCommand, TranslateConfig,
    TRANSLATE_PROGRAM,
};
