//! Error taxonomy for dataset loading, scoring, sessions and storage.
//!
//! Every variant here is recoverable: the worst outcome for a caller is
//! returning to the selection step or losing durability for one action.

use thiserror::Error;

/// Failures while fetching or parsing a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file could not be read.
    #[error("failed to read dataset {location}: {message}")]
    Read { location: String, message: String },

    /// The HTTP server answered with a non-success status.
    #[error("HTTP {status} while fetching {location}")]
    Http { location: String, status: u16 },

    /// The request never produced a response.
    #[error("network error while fetching {location}: {message}")]
    Network { location: String, message: String },

    /// The document was read but is not valid CSV/JSON.
    #[error("failed to parse {format} dataset: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Valid JSON, but none of the known dataset shapes.
    #[error("unsupported dataset shape: {0}")]
    UnsupportedShape(String),
}

/// A save was attempted before every required criterion was set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("please complete the following criteria: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Human-readable labels of the missing criteria, in form order.
    pub missing: Vec<String>,
}

/// Rejected `set` operations on a scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("unknown criterion: {0}")]
    UnknownCriterion(String),

    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

/// Invalid criteria-set descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("criteria set {0:?} has a criterion with an empty key")]
    EmptyKey(String),

    #[error("criterion key {0:?} is declared more than once")]
    DuplicateKey(String),

    #[error("criterion {key:?} has min {min} greater than max {max}")]
    InvalidBounds { key: String, min: u8, max: u8 },

    #[error("max_score {configured} is below the achievable total {achievable}")]
    MaxScoreTooLow { configured: u32, achievable: u32 },

    #[error("unknown criteria variant: {0}")]
    UnknownVariant(String),
}

/// Session-level failures surfaced to the reviewer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A valid filter combination matched zero items.
    #[error("No items found for {subject} in {locale}.")]
    EmptySelection { subject: String, locale: String },

    /// An item-level action was requested while on the selection step.
    #[error("no active selection; start a session first")]
    NoActiveSelection,

    /// A 1-based jump target outside `1..=len`.
    #[error("please enter a number between 1 and {len} (got {position})")]
    OutOfRange { position: usize, len: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Durable-storage failures. These are logged by the session, never raised.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded ({needed} bytes needed, quota {quota})")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("storage is unavailable")]
    Unavailable,

    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}
