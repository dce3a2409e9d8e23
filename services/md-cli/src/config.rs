//! Configuration loading for scidb-md.
//!
//! Settings start from the environment (`SCIDB_*`, `MDCACHE_*`, `GDAL_PATH`,
//! `SCIDB_TEMP_PATH`). A YAML file, if given, replaces them section by
//! section and may reference variables with `${VAR}` or `${VAR:-default}`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use metadata_cache::CacheConfig;
use raster_extract::TranslateConfig;
use scidb_client::ShimConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "ShimConfig::from_env")]
    pub shim: ShimConfig,
    #[serde(default = "CacheConfig::from_env")]
    pub cache: CacheConfig,
    #[serde(default = "TranslateConfig::from_env")]
    pub translate: TranslateConfig,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            shim: ShimConfig::from_env(),
            cache: CacheConfig::from_env(),
            translate: TranslateConfig::from_env(),
        }
    }

    /// Environment settings, replaced by the file's sections if a path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_env()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: CliConfig = serde_yaml::from_str(&expanded)?;
        Ok(config)
    }

    /// Validate the connection and cache sections.
    ///
    /// The translate section is only checked by commands that need it.
    pub fn validate(&self) -> Result<()> {
        self.shim
            .validate()
            .map_err(|e| anyhow::anyhow!("shim: {}", e))?;
        self.cache
            .validate()
            .map_err(|e| anyhow::anyhow!("cache: {}", e))?;
        Ok(())
    }
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }
            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}
