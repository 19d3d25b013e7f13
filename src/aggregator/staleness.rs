use chrono::{DateTime, Utc};

use crate::reading::Reading;

const JUST_NOW_SECS: i64 = 300;
const HOUR_SECS: i64 = 3600;
const DAY_SECS: i64 = 86_400;

/// Most recent `submitted_at` across every location, if any.
pub fn latest_timestamp(readings: &[Reading]) -> Option<DateTime<Utc>> {
    readings.iter().map(|r| r.submitted_at).max()
}

/// Human-readable age of the newest reading in `readings`, relative to `now`.
pub fn staleness_label(readings: &[Reading], now: DateTime<Utc>) -> String {
    label_since(latest_timestamp(readings), now)
}

/// Age label for a captured "last updated" timestamp.
///
/// The poller captures the timestamp once per snapshot and calls this on every
/// redraw tick, so the label advances between fetches without re-reading the
/// store. Thresholds are exclusive: exactly 300 seconds is "5 minutes ago".
pub fn label_since(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last_update) = last_update else {
        return "No updates yet".to_string();
    };

    let seconds_ago = (now - last_update).num_seconds();

    match seconds_ago {
        s if s < JUST_NOW_SECS => "updated just now".to_string(),
        s if s < HOUR_SECS => format!("{} minutes ago", s / 60),
        s if s < DAY_SECS => format!("{} hours ago", s / HOUR_SECS),
        s => format!("{} days ago", s / DAY_SECS),
    }
}
