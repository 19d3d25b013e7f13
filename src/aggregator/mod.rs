//! Derived views over a snapshot of readings.
//!
//! Everything here is a pure function of its inputs: a slice of
//! [`Reading`](crate::reading::Reading)s and, where time matters, a reference
//! `now`. Nothing is cached between calls, so callers are free to recompute on
//! every poll or redraw and to call these from any thread.

pub mod contributors;
pub mod format;
pub mod latest;
pub mod recommend;
pub mod staleness;

pub use contributors::recent_contributors;
pub use format::format_location_list;
pub use latest::{LatestReadings, latest_by_location, progress_value};
pub use recommend::{Recommendation, recommend_least_busy};
pub use staleness::{label_since, latest_timestamp, staleness_label};
