use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ReadingStore;
use crate::error::StoreError;
use crate::reading::{BusyLevel, Floor, LocationKey, Reading};

/// Flat CSV row. An empty `floor` is the whole-location sentinel.
#[derive(Debug, Serialize, Deserialize)]
struct ReadingRecord {
    library: String,
    floor: String,
    busy_level: i64,
    submitted_at: DateTime<Utc>,
    submitted_by: Option<String>,
}

impl From<&Reading> for ReadingRecord {
    fn from(reading: &Reading) -> Self {
        Self {
            library: reading.location.library.clone(),
            floor: reading.location.floor.clone().into(),
            busy_level: reading.busy_level.get() as i64,
            submitted_at: reading.submitted_at,
            submitted_by: reading.submitted_by.clone(),
        }
    }
}

impl TryFrom<ReadingRecord> for Reading {
    type Error = crate::error::ValidationError;

    fn try_from(record: ReadingRecord) -> Result<Self, Self::Error> {
        Ok(Reading {
            location: LocationKey::new(record.library, Floor::from(Some(record.floor))),
            busy_level: BusyLevel::new(record.busy_level)?,
            submitted_at: record.submitted_at,
            submitted_by: record.submitted_by.filter(|name| !name.is_empty()),
        })
    }
}

/// Readings kept as rows of one CSV file.
///
/// The header is written with the first row. Appends from this process are
/// serialized so rows never interleave; rows that fail to decode are skipped
/// with a warning when listing.
pub struct CsvReadingStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvReadingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn append_record(&self, record: &ReadingRecord) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let has_rows = fs::metadata(&self.path).map(|m| m.len() > 0).unwrap_or(false);
        debug!(path = %self.path.display(), has_rows, "Appending CSV reading");

        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(!has_rows)
            .from_writer(file);

        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Reading>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_path(&self.path)?;
        let mut readings = Vec::new();

        for (row, result) in rdr.deserialize::<ReadingRecord>().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!(path = %self.path.display(), row, error = %e, "Skipping undecodable row");
                    continue;
                }
            };

            match Reading::try_from(record) {
                Ok(reading) => readings.push(reading),
                Err(e) => {
                    warn!(path = %self.path.display(), row, error = %e, "Skipping invalid reading");
                }
            }
        }

        Ok(readings)
    }
}

#[async_trait]
impl ReadingStore for CsvReadingStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.append_record(&ReadingRecord::from(reading))
    }

    async fn list_all(&self) -> Result<Vec<Reading>, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.read_all()
    }
}
