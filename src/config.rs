//! Runtime settings and the location catalog.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::reading::LocationKey;

pub const MIN_POLL_SECS: u64 = 5;
pub const MAX_POLL_SECS: u64 = 60;

/// Settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV path or `http(s)://` base URL of the reading store.
    pub store: String,
    /// Optional path to a catalog JSON file.
    pub catalog_path: Option<String>,
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            store: try_load("LIBSTATUS_STORE", "data/readings.csv".to_string()),
            catalog_path: env::var("LIBSTATUS_CATALOG").ok().filter(|p| !p.is_empty()),
            poll_interval: poll_interval(try_load("LIBSTATUS_POLL_SECS", MAX_POLL_SECS)),
        }
    }

    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::default()),
        }
    }
}

/// Clamps a poll period to the supported 5..=60 second window.
pub fn poll_interval(secs: u64) -> Duration {
    let clamped = secs.clamp(MIN_POLL_SECS, MAX_POLL_SECS);
    if clamped != secs {
        warn!(requested = secs, used = clamped, "Poll interval out of range, clamping");
    }
    Duration::from_secs(clamped)
}

fn try_load<T: FromStr>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Locations shown on the dashboard and where to send people when they are
/// all busy.
///
/// Stored as JSON:
/// ```json
/// {
///   "locations": [
///     { "library": "Moffitt Library", "floor": "Floor 1" },
///     { "library": "Doe Library" }
///   ],
///   "fallbacks": ["Haas Library", "Doe Library"],
///   "contributors": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub locations: Vec<LocationKey>,
    #[serde(default)]
    pub fallbacks: Vec<String>,
    #[serde(default = "default_contributors")]
    pub contributors: usize,
}

fn default_contributors() -> usize {
    5
}

impl Catalog {
    /// Loads the catalog from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("failed to read catalog '{path}'"))?;
        let catalog: Catalog =
            serde_json::from_str(&content).with_context(|| format!("invalid catalog '{path}'"))?;
        info!(path, locations = catalog.locations.len(), "Loaded location catalog");
        Ok(catalog)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            locations: ["Floor 1", "Floor 3", "Floor 4", "Floor 5"]
                .into_iter()
                .map(|floor| LocationKey::floor("Moffitt Library", floor))
                .collect(),
            fallbacks: vec!["Haas Library".to_string(), "Doe Library".to_string()],
            contributors: default_contributors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Floor;
    use std::fs;

    #[test]
    fn test_poll_interval_clamped() {
        assert_eq!(poll_interval(1), Duration::from_secs(5));
        assert_eq!(poll_interval(30), Duration::from_secs(30));
        assert_eq!(poll_interval(600), Duration::from_secs(60));
    }

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();

        assert_eq!(catalog.locations.len(), 4);
        assert_eq!(catalog.locations[1], LocationKey::floor("Moffitt Library", "Floor 3"));
        assert_eq!(catalog.fallbacks, vec!["Haas Library", "Doe Library"]);
    }

    #[test]
    fn test_load_catalog_file() {
        let path = std::env::temp_dir().join("library_status_test_catalog.json");
        fs::write(
            &path,
            r#"{"locations":[{"library":"Main Stacks","floor":"B1"},{"library":"Doe Library","floor":null}],"fallbacks":["Haas Library"]}"#,
        )
        .unwrap();

        let catalog = Catalog::load(path.to_str().unwrap()).unwrap();

        assert_eq!(catalog.locations[0], LocationKey::floor("Main Stacks", "B1"));
        assert_eq!(catalog.locations[1].floor, Floor::Whole);
        assert_eq!(catalog.contributors, 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_catalog_errors() {
        assert!(Catalog::load("/nonexistent/library_status_catalog.json").is_err());
    }
}
