//! Append-only reading stores.
//!
//! [`ReadingStore`] is the only contract the rest of the crate relies on.
//! [`CsvReadingStore`] keeps readings in a local CSV file,
//! [`HttpReadingStore`] talks to a remote endpoint, and
//! [`MemoryReadingStore`] backs tests.

mod csv_file;
mod http;
mod memory;

pub use csv_file::CsvReadingStore;
pub use http::HttpReadingStore;
pub use memory::MemoryReadingStore;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::fetch::BasicClient;
use crate::reading::Reading;

/// Persistence for readings.
///
/// Implementations must keep every appended reading, including ones appended
/// concurrently, and never rewrite or delete earlier ones.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError>;

    /// Every reading ever appended, in no particular order.
    async fn list_all(&self) -> Result<Vec<Reading>, StoreError>;
}

/// Opens a store from a CSV path or an `http(s)://` base URL.
pub fn open_store(source: &str) -> Result<Arc<dyn ReadingStore>, StoreError> {
    if is_remote(source) {
        let client = BasicClient::with_timeouts(Duration::from_secs(30), Duration::from_secs(10))?;
        Ok(Arc::new(HttpReadingStore::new(source, client)))
    } else {
        Ok(Arc::new(CsvReadingStore::new(source)))
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
