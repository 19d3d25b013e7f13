use std::collections::HashMap;

use crate::reading::{LocationKey, Reading};

/// The current reading for each location in a snapshot.
pub type LatestReadings = HashMap<LocationKey, Reading>;

/// Selects the most recent reading per location.
///
/// When two readings for the same location share a timestamp, the one that
/// appears first in `readings` wins. This matches a stable descending sort
/// followed by taking the head of each group.
pub fn latest_by_location(readings: &[Reading]) -> LatestReadings {
    let mut latest: LatestReadings = HashMap::new();

    for reading in readings {
        match latest.get(&reading.location) {
            Some(current) if current.submitted_at >= reading.submitted_at => {}
            _ => {
                latest.insert(reading.location.clone(), reading.clone());
            }
        }
    }

    latest
}

/// Capacity percentage of the current reading for `key`, or 0 when the
/// location has no reading.
pub fn progress_value(latest: &LatestReadings, key: &LocationKey) -> u8 {
    latest
        .get(key)
        .map(|reading| reading.busy_level.percent())
        .unwrap_or(0)
}
