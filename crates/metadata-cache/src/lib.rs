//! Cache of decoded array metadata.
//!
//! [`ArrayMetadataCache`] sits between request handling and a
//! [`MetadataSource`](scidb_client::MetadataSource). Entries are served
//! while their age is within the refresh window; older or unknown entries
//! are fetched from the backend in one batch per lookup.

pub mod cache;
pub mod clock;
pub mod config;

pub use cache::{ArrayMetadataCache, CacheStats};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
