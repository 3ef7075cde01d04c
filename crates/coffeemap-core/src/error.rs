// crates/coffeemap-core/src/error.rs
use std::fmt;
use thiserror::Error;

/// Which required column a tabular dataset was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Country,
    Year,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Country => f.write_str("country"),
            ColumnKind::Year => f.write_str("year"),
        }
    }
}

/// Errors raised by the loaders, the reshape layer and configuration.
///
/// Name matching itself never produces one of these: an unmatched country is
/// reported as `None` in a [`crate::matcher::MatchResult`].
#[derive(Debug, Error)]
pub enum CoffeeMapError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Terminal for the current view; the caller shows it and stops.
    #[error("No {0} column detected in the dataset")]
    MissingColumn(ColumnKind),

    #[error("Cutoff must be within [0, 1], got {0}")]
    InvalidCutoff(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

pub type Result<T> = std::result::Result<T, CoffeeMapError>;
