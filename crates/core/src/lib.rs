//! Coinfolio Core - position and portfolio valuation engine.
//!
//! This crate contains the domain models and computation core: the order
//! ledger, the position valuator, the portfolio aggregator, and the
//! historical valuation series. It is storage-agnostic and defines traits
//! that are implemented by the `storage-memory` crate.
//!
//! The computations are pure, synchronous functions over immutable inputs
//! (a position or portfolio snapshot plus a price map); they perform no
//! I/O and hold no shared mutable state, so they can be invoked
//! concurrently without locking. Ordering guarantees (pin switches,
//! valuation append-and-promote) live behind the repository traits.

pub mod constants;
pub mod errors;
pub mod history;
pub mod portfolios;
pub mod positions;
pub mod temporal;
pub mod utils;
pub mod valuation;

// Re-export common types
pub use temporal::TemporalValue;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
