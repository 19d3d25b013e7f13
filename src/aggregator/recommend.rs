use serde::Serialize;

use crate::aggregator::latest::{LatestReadings, progress_value};
use crate::reading::LocationKey;

/// Progress above which a location counts as busy for groups.
const BUSY_THRESHOLD: u8 = 79;

/// Outcome of [`recommend_least_busy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Non-full candidates tied at the lowest busy level, in candidate order.
    pub least_busy: Vec<LocationKey>,
    /// Every candidate with a reading is at level 4 or above. Vacuously true
    /// when no candidate has a reading.
    pub all_busy: bool,
}

/// Picks the least busy candidate locations.
///
/// Candidates without a current reading are skipped rather than treated as
/// empty. Full locations never appear in `least_busy` but still count toward
/// `all_busy`.
pub fn recommend_least_busy(latest: &LatestReadings, candidates: &[LocationKey]) -> Recommendation {
    let mut min_level = u8::MAX;
    let mut least_busy: Vec<LocationKey> = Vec::new();
    let mut all_busy = true;

    for key in candidates {
        let Some(reading) = latest.get(key) else {
            continue;
        };
        if least_busy.contains(key) {
            continue;
        }

        let level = reading.busy_level;
        if progress_value(latest, key) <= BUSY_THRESHOLD {
            all_busy = false;
        }

        if level.is_full() {
            continue;
        }

        if level.get() < min_level {
            min_level = level.get();
            least_busy.clear();
            least_busy.push(key.clone());
        } else if level.get() == min_level {
            least_busy.push(key.clone());
        }
    }

    Recommendation {
        least_busy,
        all_busy,
    }
}
