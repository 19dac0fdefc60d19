//! Historical valuation series module.
//!
//! An append-mostly, time-stamped record of portfolio value used for trend
//! display and day-change computation.

mod history_model;
mod history_service;
mod history_traits;

pub use history_model::*;
pub use history_service::{aggregate_series, ValuationHistoryService};
pub use history_traits::{ValuationHistoryServiceTrait, ValuationRepositoryTrait};

#[cfg(test)]
mod history_service_tests;
