//! One rendered state of the occupancy dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregator::{
    Recommendation, format_location_list, label_since, latest_by_location, latest_timestamp,
    progress_value, recent_contributors, recommend_least_busy,
};
use crate::config::Catalog;
use crate::reading::{LocationKey, Reading};

/// Progress bar for one catalog location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRow {
    pub location: LocationKey,
    pub name: String,
    pub progress: u8,
    /// Status text of the current reading, `None` if nobody reported yet.
    pub status: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub updated: String,
    /// Newest reading in the snapshot this view was built from.
    pub last_update: Option<DateTime<Utc>>,
    pub rows: Vec<LocationRow>,
    pub recommendation: Recommendation,
    pub solo: String,
    pub group: String,
    pub contributors: Vec<String>,
    /// Non-fatal problem with the latest refresh.
    pub notice: Option<String>,
}

impl DashboardView {
    pub fn build(snapshot: &[Reading], catalog: &Catalog, now: DateTime<Utc>) -> Self {
        let latest = latest_by_location(snapshot);
        let last_update = latest_timestamp(snapshot);

        let rows = catalog
            .locations
            .iter()
            .map(|key| LocationRow {
                location: key.clone(),
                name: key.to_string(),
                progress: progress_value(&latest, key),
                status: latest.get(key).map(|r| r.busy_level.label()),
            })
            .collect();

        let recommendation = recommend_least_busy(&latest, &catalog.locations);
        let picks: Vec<String> = recommendation.least_busy.iter().map(|k| k.to_string()).collect();
        let fallbacks = format_location_list(&catalog.fallbacks);

        let recommend = format!(
            "We recommend {} as it's currently the least busy!",
            format_location_list(&picks)
        );

        let solo = if picks.is_empty() {
            all_busy_sentence("All floors are at full capacity.", "studying at", &fallbacks)
        } else {
            recommend.clone()
        };

        let group = if recommendation.all_busy || picks.is_empty() {
            all_busy_sentence("All floors are quite busy.", "going to", &fallbacks)
        } else {
            recommend
        };

        Self {
            updated: label_since(last_update, now),
            last_update,
            rows,
            recommendation,
            solo,
            group,
            contributors: recent_contributors(snapshot, catalog.contributors),
            notice: None,
        }
    }

    /// Recomputes only the staleness label against the captured timestamp.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.updated = label_since(self.last_update, now);
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Appends the fallback suggestion unless the catalog names no fallbacks.
fn all_busy_sentence(lead: &str, verb: &str, fallbacks: &str) -> String {
    if fallbacks.is_empty() {
        lead.to_string()
    } else {
        format!("{lead} We recommend {verb} {fallbacks}.")
    }
}
