//! Transports that fetch array metadata from the array engine.
//!
//! [`MetadataSource`] is the seam the cache depends on. [`ShimClient`]
//! implements it over the engine's HTTP shim; [`TabularSource`] adapts any
//! query channel that returns named string columns.

pub mod afl;
pub mod config;
pub mod csv;
pub mod error;
pub mod shim;
pub mod source;

pub use afl::eo_all_query;
pub use config::ShimConfig;
pub use error::{TransportError, TransportResult};
pub use shim::ShimClient;
pub use source::{MetadataSource, TabularQuery, TabularSource};
