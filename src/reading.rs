//! Occupancy readings and the keys they are tracked under.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Floor or zone within a library.
///
/// [`Floor::Whole`] is the sentinel for libraries that are not subdivided; a
/// reading under it applies to the entire building. It serializes as an empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Floor {
    Whole,
    Named(String),
}

impl Floor {
    /// A named floor; a blank label is the whole location.
    pub fn named(label: impl Into<String>) -> Self {
        Floor::from(Some(label.into()))
    }
}

impl From<Option<String>> for Floor {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(label) if !label.trim().is_empty() => Floor::Named(label.trim().to_string()),
            _ => Floor::Whole,
        }
    }
}

impl From<Floor> for String {
    fn from(value: Floor) -> Self {
        match value {
            Floor::Whole => String::new(),
            Floor::Named(label) => label,
        }
    }
}

/// Compound key identifying an independently tracked space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationKey {
    pub library: String,
    #[serde(default = "whole_floor")]
    pub floor: Floor,
}

fn whole_floor() -> Floor {
    Floor::Whole
}

impl LocationKey {
    pub fn new(library: impl Into<String>, floor: Floor) -> Self {
        Self {
            library: library.into(),
            floor,
        }
    }

    /// Key for a library with no floor subdivision.
    pub fn whole(library: impl Into<String>) -> Self {
        Self::new(library, Floor::Whole)
    }

    pub fn floor(library: impl Into<String>, floor: impl Into<String>) -> Self {
        Self::new(library, Floor::named(floor))
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.floor {
            Floor::Whole => write!(f, "{}", self.library),
            Floor::Named(label) => write!(f, "{} {}", self.library, label),
        }
    }
}

/// Ordinal occupancy scale, 1 (emptiest) through 5 (completely full).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct BusyLevel(u8);

impl BusyLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::BusyLevelOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Display capacity percentage; level 5 is the 100% ceiling.
    pub fn percent(self) -> u8 {
        self.0 * 20
    }

    pub fn is_full(self) -> bool {
        self.percent() == 100
    }

    /// Status text shown next to the submission slider.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Wide Open",
            2 => "Not Too Busy",
            3 => "Kinda Busy",
            4 => "Very Busy",
            _ => "Extremely Busy",
        }
    }
}

impl TryFrom<i64> for BusyLevel {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BusyLevel> for u8 {
    fn from(value: BusyLevel) -> Self {
        value.0
    }
}

/// One submitted occupancy observation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub location: LocationKey,
    pub busy_level: BusyLevel,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
}

impl Reading {
    pub fn new(location: LocationKey, busy_level: BusyLevel, submitted_at: DateTime<Utc>) -> Self {
        Self {
            location,
            busy_level,
            submitted_at,
            submitted_by: None,
        }
    }

    pub fn with_contributor(mut self, name: impl Into<String>) -> Self {
        self.submitted_by = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_busy_level_bounds() {
        assert!(BusyLevel::new(0).is_err());
        assert!(BusyLevel::new(6).is_err());
        assert!(BusyLevel::new(-3).is_err());
        for v in 1..=5 {
            assert_eq!(BusyLevel::new(v).unwrap().get() as i64, v);
        }
    }

    #[test]
    fn test_busy_level_percent_and_labels() {
        let percents: Vec<u8> = (1..=5).map(|v| BusyLevel::new(v).unwrap().percent()).collect();
        assert_eq!(percents, vec![20, 40, 60, 80, 100]);

        assert_eq!(BusyLevel::new(1).unwrap().label(), "Wide Open");
        assert_eq!(BusyLevel::new(5).unwrap().label(), "Extremely Busy");
        assert!(BusyLevel::new(5).unwrap().is_full());
        assert!(!BusyLevel::new(4).unwrap().is_full());
    }

    #[test]
    fn test_location_display() {
        assert_eq!(
            LocationKey::floor("Moffitt Library", "Floor 3").to_string(),
            "Moffitt Library Floor 3"
        );
        assert_eq!(LocationKey::whole("Doe Library").to_string(), "Doe Library");
    }

    #[test]
    fn test_blank_floor_is_whole_location() {
        assert_eq!(Floor::from(Some("   ".to_string())), Floor::Whole);
        assert_eq!(Floor::from(None), Floor::Whole);
        assert_eq!(Floor::from(Some(" Floor 1 ".to_string())), Floor::named("Floor 1"));
    }

    #[test]
    fn test_blank_named_floor_is_whole_location() {
        assert_eq!(Floor::named(""), Floor::Whole);
        assert_eq!(Floor::named("  Floor 2 "), Floor::Named("Floor 2".to_string()));
        assert_eq!(
            LocationKey::floor("Doe Library", " "),
            LocationKey::whole("Doe Library")
        );
    }

    #[test]
    fn test_reading_json_shape() {
        let reading = Reading::new(
            LocationKey::whole("Doe Library"),
            BusyLevel::new(2).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap(),
        );
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["location"]["library"], "Doe Library");
        assert_eq!(json["location"]["floor"], "");
        assert_eq!(json["busy_level"], 2);
        assert!(json.get("submitted_by").is_none());

        let parsed: Reading =
            serde_json::from_str(r#"{"location":{"library":"Doe Library"},"busy_level":2,"submitted_at":"2024-10-01T12:00:00Z"}"#)
                .unwrap();
        assert_eq!(parsed, reading);
    }

    #[test]
    fn test_reading_json_rejects_out_of_range_level() {
        let result: Result<Reading, _> = serde_json::from_str(
            r#"{"location":{"library":"Doe Library","floor":null},"busy_level":9,"submitted_at":"2024-10-01T12:00:00Z"}"#,
        );
        assert!(result.is_err());
    }
}
