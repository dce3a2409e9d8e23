//! Argument vectors for `gdal_translate`.

use std::path::{Path, PathBuf};

use scidb_client::ShimConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::resolve::{ResolvedExtraction, Window};

pub const TRANSLATE_PROGRAM: &str = "gdal_translate";

/// Where the translation tool lives and where it writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Directory containing the tool; resolved through `PATH` when unset.
    pub gdal_path: Option<PathBuf>,

    /// Directory for output files.
    pub temp_path: PathBuf,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            gdal_path: None,
            temp_path: std::env::temp_dir(),
        }
    }
}

impl TranslateConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GDAL_PATH") {
            if !val.trim().is_empty() {
                config.gdal_path = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("SCIDB_TEMP_PATH") {
            if !val.trim().is_empty() {
                config.temp_path = PathBuf::from(val);
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.temp_path.is_dir() {
            return Err(format!(
                "temp path {} is not a directory",
                self.temp_path.display()
            ));
        }
        if let Some(dir) = &self.gdal_path {
            if !dir.is_dir() {
                return Err(format!("GDAL path {} is not a directory", dir.display()));
            }
        }
        Ok(())
    }

    pub fn program(&self) -> PathBuf {
        match &self.gdal_path {
            Some(dir) => dir.join(TRANSLATE_PROGRAM),
            None => PathBuf::from(TRANSLATE_PROGRAM),
        }
    }
}

/// A complete tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslateCommand {
    pub request_id: Uuid,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl TranslateCommand {
    /// Build the invocation under a fresh request id.
    pub fn new(resolved: &ResolvedExtraction, config: &TranslateConfig, shim: &ShimConfig) -> Self {
        Self::with_request_id(resolved, config, shim, Uuid::new_v4())
    }

    pub fn with_request_id(
        resolved: &ResolvedExtraction,
        config: &TranslateConfig,
        shim: &ShimConfig,
        request_id: Uuid,
    ) -> Self {
        let output = output_path(&config.temp_path, request_id, resolved);
        let args = translate_args(resolved, shim, &output);
        debug!(
            request_id = %request_id,
            coverage = %resolved.coverage,
            output = %output.display(),
            "Built translate command"
        );
        Self {
            request_id,
            program: config.program(),
            args,
            output,
        }
    }

    /// Program followed by its arguments.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// `<temp>/<request-id>.<ext>`
pub fn output_path(temp: &Path, request_id: Uuid, resolved: &ResolvedExtraction) -> PathBuf {
    temp.join(format!("{}.{}", request_id, resolved.format.extension()))
}

/// Dataset name under which the backend array is opened.
pub fn connection_string(array: &str, shim: &ShimConfig) -> String {
    format!(
        "SCIDB:array={} host={}://{} port={} user={} password={}",
        array,
        shim.scheme(),
        shim.host,
        shim.port,
        shim.user,
        shim.password
    )
}

/// Arguments after the program name.
pub fn translate_args(resolved: &ResolvedExtraction, shim: &ShimConfig, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    if let Some((resx, resy)) = resolved.geometry.resolution {
        args.extend(["-tr".to_string(), resx.to_string(), resy.to_string()]);
    }
    if let Some((width, height)) = resolved.geometry.size {
        args.extend(["-outsize".to_string(), width.to_string(), height.to_string()]);
    }

    match &resolved.window {
        Some(Window::Pixel {
            xoff,
            yoff,
            xsize,
            ysize,
        }) => {
            args.push("-srcwin".to_string());
            args.extend([xoff, yoff, xsize, ysize].map(|v| v.to_string()));
        }
        Some(Window::Projected {
            ulx,
            uly,
            lrx,
            lry,
            srs,
        }) => {
            args.push("-projwin".to_string());
            args.extend([ulx, uly, lrx, lry].map(|v| v.to_string()));
            args.extend(["-projwin_srs".to_string(), srs.clone()]);
        }
        None => {}
    }

    if let Some(index) = resolved.time_index {
        args.extend(["-oo".to_string(), format!("t={}", index)]);
    }

    args.extend(["-of".to_string(), resolved.format.driver().to_string()]);

    if let Some(interpolation) = resolved.interpolation {
        args.extend(["-r".to_string(), interpolation.resampling().to_string()]);
    }

    args.push(connection_string(&resolved.coverage, shim));
    args.push(output.display().to_string());
    args
}
