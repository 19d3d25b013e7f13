use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ReadingStore;
use crate::error::StoreError;
use crate::reading::Reading;

/// Readings held in process memory.
#[derive(Default)]
pub struct MemoryReadingStore {
    readings: RwLock<Vec<Reading>>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readings(readings: Vec<Reading>) -> Self {
        Self {
            readings: RwLock::new(readings),
        }
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        self.readings.write().await.push(reading.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Reading>, StoreError> {
        Ok(self.readings.read().await.clone())
    }
}
