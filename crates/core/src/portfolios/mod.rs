//! Portfolios module - domain models, aggregation service, and traits.

mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;

pub use portfolios_model::*;
pub use portfolios_service::{compute_day_change, rank_top_holdings, PortfolioService};
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
