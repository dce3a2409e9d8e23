//! Metadata transport abstraction.

use std::collections::HashMap;

use async_trait::async_trait;
use md_parser::MetadataRow;
use tracing::{debug, instrument};

use crate::afl::eo_all_query;
use crate::error::{TransportError, TransportResult};

/// A channel that can run the metadata query against the array engine.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Raw metadata rows for `names`, or for every array if `names` is empty.
    ///
    /// Arrays the backend does not know are simply absent from the result.
    async fn fetch_metadata(&self, names: &[String]) -> TransportResult<Vec<MetadataRow>>;
}

#[async_trait]
impl<S: MetadataSource + ?Sized> MetadataSource for std::sync::Arc<S> {
    async fn fetch_metadata(&self, names: &[String]) -> TransportResult<Vec<MetadataRow>> {
        (**self).fetch_metadata(names).await
    }
}

/// A query channel returning named string columns, such as a database
/// driver bridged into the engine.
#[async_trait]
pub trait TabularQuery: Send + Sync {
    async fn query(&self, afl: &str) -> TransportResult<Vec<HashMap<String, String>>>;
}

/// Adapts a [`TabularQuery`] into a [`MetadataSource`].
///
/// `name`, `dimensions` and `attributes` columns are required; the
/// reference and extent columns default to empty.
pub struct TabularSource<Q> {
    query: Q,
}

impl<Q: TabularQuery> TabularSource<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

fn required(row: &mut HashMap<String, String>, column: &str) -> TransportResult<String> {
    row.remove(column)
        .ok_or_else(|| TransportError::MissingColumn(column.to_string()))
}

#[async_trait]
impl<Q: TabularQuery> MetadataSource for TabularSource<Q> {
    #[instrument(skip(self), fields(count = names.len()))]
    async fn fetch_metadata(&self, names: &[String]) -> TransportResult<Vec<MetadataRow>> {
        let afl = eo_all_query(names)?;
        let rows = self.query.query(&afl).await?;
        debug!(rows = rows.len(), "Tabular metadata query returned");

        rows.into_iter()
            .map(|mut row| {
                Ok(MetadataRow {
                    name: required(&mut row, "name")?,
                    dimensions: required(&mut row, "dimensions")?,
                    attributes: required(&mut row, "attributes")?,
                    srs: row.remove("srs").unwrap_or_default(),
                    trs: row.remove("trs").unwrap_or_default(),
                    extent: row.remove("extent").unwrap_or_default(),
                })
            })
            .collect()
    }
}
