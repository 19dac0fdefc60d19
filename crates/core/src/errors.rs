//! Core error types for the coinfolio valuation engine.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! are converted to these types by the storage layer.

use chrono::{DateTime, ParseError as ChronoParseError, Utc};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the valuation engine.
///
/// Every failure condition in the core is a value of this type returned to
/// the caller; nothing in the core panics or performs I/O.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Order ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Valuation series error: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Portfolio error: {0}")]
    Portfolio(#[from] PortfolioError),

    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised while deriving cost basis and filled size from an order list.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A filled order is missing the data that makes it meaningful.
    /// This indicates upstream data corruption and must propagate unchanged;
    /// defaulting the missing cost to zero would corrupt cost-basis totals.
    #[error("Order {order_id} is filled but missing {field}")]
    InvalidOrderState { order_id: String, field: &'static str },

    /// A percentage- or quote-denominated size could not be normalized to
    /// base units because no reference price was available.
    #[error("Cannot resolve {unit} size for order {order_id}: no reference price")]
    InsufficientData { order_id: String, unit: &'static str },
}

/// Errors raised by the historical valuation series.
#[derive(Error, Debug)]
pub enum ValuationError {
    /// A write targeted a timestamp already occupied by an immutable
    /// HISTORICAL record.
    #[error("Valuation already recorded for portfolio {portfolio_id} at {timestamp}")]
    DuplicateTimestamp {
        portfolio_id: String,
        timestamp: DateTime<Utc>,
    },

    #[error("No valuation history for portfolio {0}")]
    NoHistory(String),
}

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Portfolio {0} not found")]
    NotFound(String),

    /// More than one portfolio was observed pinned for a user, meaning a
    /// previous pin switch was not applied atomically.
    #[error("Pinned-portfolio invariant violated for user {user_id}: {pinned_count} portfolios pinned")]
    PinnedPortfolioConflict { user_id: String, pinned_count: usize },
}

#[derive(Error, Debug)]
pub enum PositionError {
    #[error("Position {0} not found")]
    NotFound(String),

    /// Closed positions are frozen; their order list can no longer change.
    #[error("Position {0} is closed and cannot be modified")]
    Closed(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Risk level must be between 1 and 10, got {0}")]
    RiskLevelOutOfRange(u8),

    #[error("Percentage size must be in (0, 1], got {0}")]
    PercentageOutOfRange(rust_decimal::Decimal),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
