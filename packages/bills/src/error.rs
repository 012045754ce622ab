//! Error types for the bills crate.
//!
//! Classification itself never fails; these errors only come out of the
//! decoding helpers that turn scraper output into [`crate::raw::RawBill`] values.

use thiserror::Error;

/// Main error type for bill decoding.
#[derive(Debug, Error)]
pub enum BillError {
    /// Raw bill JSON could not be decoded.
    #[error("invalid raw bill JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Date string in none of the accepted formats.
    #[error("Invalid date format: '{0}'. Expected DD/MM/YYYY or YYYY-MM-DD")]
    InvalidDate(String),
}

/// Result type alias for bill operations.
pub type Result<T> = std::result::Result<T, BillError>;
