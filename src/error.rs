use thiserror::Error;

/// A submission rejected at the boundary. These never reach the aggregator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("busy level {0} is outside 1..=5")]
    BusyLevelOutOfRange(i64),

    #[error("location is missing a library name")]
    MissingLibrary,
}

/// Failure talking to a reading store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("reading store unavailable: {0}")]
    Unavailable(String),

    #[error("reading store returned corrupt data: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Corrupt(e.to_string())
        } else {
            StoreError::Unavailable(e.to_string())
        }
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Corrupt(e.to_string())
        }
    }
}

/// Why a submission was not recorded.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
