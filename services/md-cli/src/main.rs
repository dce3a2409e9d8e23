//! scidb-md: array metadata from the command line.
//!
//! Lists and describes arrays through the metadata cache, converts between
//! instants and time-axis indices, and prints the raster translation command
//! for a coverage subset.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metadata_cache::ArrayMetadataCache;
use projection::Proj4Reprojector;
use scidb_client::ShimClient;
use tracing::{debug, error};
use tracing_subscriber::{fmt, EnvFilter};

use commands::TranslateParams;
use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "scidb-md")]
#[command(about = "Inspect array metadata and build raster extraction commands")]
struct Args {
    /// YAML configuration file (shim, cache, translate sections)
    #[arg(short, long, env = "SCIDB_MD_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Shim host
    #[arg(long, env = "SCIDB_HOST", global = true)]
    host: Option<String>,

    /// Shim port
    #[arg(long, env = "SCIDB_SHIM_PORT", global = true)]
    port: Option<u16>,

    /// Backend user
    #[arg(long, env = "SCIDB_USER", global = true)]
    user: Option<String>,

    /// Backend password
    #[arg(long, env = "SCIDB_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Use HTTPS and authenticate against the shim
    #[arg(long, env = "SCIDB_SSL", global = true)]
    ssl: Option<bool>,

    /// Seconds a cached descriptor is served without refetching
    #[arg(long, env = "MDCACHE_REFRESH_AFTER_SECS", global = true)]
    refresh_after_secs: Option<u64>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reload all arrays and print one schema line each
    List,

    /// Print an array's descriptor and WGS84 extent as JSON
    Describe { array: String },

    /// Time-axis index of an instant
    TimeIndex { array: String, instant: String },

    /// Instant at which a time-axis cell starts
    Instant {
        array: String,
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Print the raster translation command for a subset
    TranslateArgs {
        array: String,

        /// CRS of the bounding box, or IMAGE for pixel coordinates
        #[arg(long, default_value = "EPSG:4326")]
        crs: String,

        /// xmin,ymin,xmax,ymax
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Single ISO-8601 instant
        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        #[arg(long)]
        resx: Option<f64>,

        #[arg(long)]
        resy: Option<f64>,

        /// GeoTIFF, PNG, JPEG, GIF, BMP or NetCDF
        #[arg(long, default_value = "GeoTIFF")]
        format: String,

        /// nearest, bilinear or bicubic
        #[arg(long)]
        interpolation: Option<String>,

        /// Print the command as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &Args) -> Result<CliConfig> {
    let mut config = CliConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(host) = &args.host {
        config.shim.host = host.clone();
    }
    if let Some(port) = args.port {
        config.shim.port = port;
    }
    if let Some(user) = &args.user {
        config.shim.user = user.clone();
    }
    if let Some(password) = &args.password {
        config.shim.password = password.clone();
    }
    if let Some(ssl) = args.ssl {
        config.shim.ssl = ssl;
        config.shim.auth = ssl;
    }
    if let Some(secs) = args.refresh_after_secs {
        config.cache.refresh_after_secs = secs;
    }

    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    debug!(host = %config.shim.host, port = config.shim.port, "Using shim");

    let client = ShimClient::new(config.shim.clone()).context("Failed to create shim client")?;
    let cache = ArrayMetadataCache::new(Arc::new(client), config.cache.clone());

    let output = match args.command {
        Command::List => commands::list(&cache).await?,
        Command::Describe { array } => commands::describe(&cache, &Proj4Reprojector, &array).await?,
        Command::TimeIndex { array, instant } => {
            commands::time_index(&cache, &array, &instant).await?
        }
        Command::Instant { array, index } => commands::instant(&cache, &array, index).await?,
        Command::TranslateArgs {
            array,
            crs,
            bbox,
            time,
            width,
            height,
            resx,
            resy,
            format,
            interpolation,
            json,
        } => {
            config
                .translate
                .validate()
                .map_err(|e| anyhow::anyhow!("translate: {}", e))?;
            let params = TranslateParams {
                crs,
                bbox,
                time,
                width,
                height,
                resx,
                resy,
                format,
                interpolation,
            };
            let cmd =
                commands::translate_args(&cache, &config.shim, &config.translate, &array, &params)
                    .await?;
            if json {
                serde_json::to_string_pretty(&cmd)?
            } else {
                commands::shell_line(&cmd.command_line())
            }
        }
    };

    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(commands::exit_code(&e));
    }
}
