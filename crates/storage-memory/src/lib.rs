//! In-memory storage implementation for coinfolio.
//!
//! This crate implements the repository traits defined in `coinfolio-core`
//! with process-memory stores. It is the only place where the ordering
//! guarantees of the persistence contract live:
//!
//! - a pin switch unpins and pins under one write guard, so readers see
//!   either the old or the new designation, never both or neither;
//! - appending a valuation and demoting the prior `Active` record commit
//!   under one write guard as a single unit.
//!
//! The core never re-checks these guarantees; it assumes them.

pub mod history;
pub mod portfolios;
pub mod positions;

pub use history::MemoryValuationRepository;
pub use portfolios::MemoryPortfolioRepository;
pub use positions::MemoryPositionRepository;

// Re-export from coinfolio-core for convenience
pub use coinfolio_core::errors::{Error, Result};
