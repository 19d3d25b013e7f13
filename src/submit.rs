//! Submission boundary: raw user input in, validated [`Reading`] out.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{SubmitError, ValidationError};
use crate::reading::{BusyLevel, Floor, LocationKey, Reading};
use crate::store::ReadingStore;

/// Unvalidated submission as it arrives from a form or CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub library: String,
    #[serde(default)]
    pub floor: Option<String>,
    pub busy_level: i64,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl Submission {
    /// Checks the submission and stamps it with `now`.
    pub fn into_reading(self, now: DateTime<Utc>) -> Result<Reading, ValidationError> {
        let library = self.library.trim();
        if library.is_empty() {
            return Err(ValidationError::MissingLibrary);
        }

        let busy_level = BusyLevel::new(self.busy_level)?;
        let location = LocationKey::new(library, Floor::from(self.floor));

        Ok(Reading {
            location,
            busy_level,
            submitted_at: now,
            submitted_by: self
                .submitted_by
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        })
    }
}

/// Validates `submission`, stamps it with `now` and appends it to `store`.
#[tracing::instrument(skip(store), fields(library = %submission.library, busy_level = submission.busy_level))]
pub async fn submit<S: ReadingStore + ?Sized>(
    store: &S,
    submission: Submission,
    now: DateTime<Utc>,
) -> Result<Reading, SubmitError> {
    let reading = submission.into_reading(now).map_err(|e| {
        warn!(error = %e, "Rejected submission");
        e
    })?;

    store.append(&reading).await?;
    info!(location = %reading.location, "Reading recorded");

    Ok(reading)
}
