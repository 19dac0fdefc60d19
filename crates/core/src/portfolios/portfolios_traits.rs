//! Repository and service traits for portfolios.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioSummary, PortfolioUpdate};
use crate::errors::Result;
use crate::valuation::PriceMap;

/// Storage contract for portfolio records.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    async fn update(&self, update: PortfolioUpdate) -> Result<Portfolio>;

    async fn delete(&self, portfolio_id: &str) -> Result<usize>;

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Portfolio>>;

    /// Unpins whatever the user currently has pinned and pins the target,
    /// as one atomic unit. Readers must never observe zero or two pinned
    /// portfolios for the user. A pre-existing double pin is reported as
    /// `PinnedPortfolioConflict`.
    async fn set_pinned(&self, user_id: &str, portfolio_id: &str) -> Result<Portfolio>;

    fn get_pinned(&self, user_id: &str) -> Result<Option<Portfolio>>;
}

/// Service contract for portfolio aggregation and lifecycle.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    async fn update_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio>;

    /// Deletes the portfolio aggregate: the record, its positions, and its
    /// valuation history.
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()>;

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    fn list_portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>>;

    /// Rolls up the portfolio's positions and valuation history into a
    /// summary, using the supplied prices.
    fn compute_summary(&self, portfolio_id: &str, prices: &PriceMap) -> Result<PortfolioSummary>;

    /// Ticker symbols of the `n` largest holdings by current value.
    fn top_holdings(&self, portfolio_id: &str, prices: &PriceMap, n: usize)
        -> Result<Vec<String>>;

    /// Designates the user's primary portfolio, atomically replacing any
    /// previous designation.
    async fn set_pinned_portfolio(&self, user_id: &str, portfolio_id: &str) -> Result<Portfolio>;

    /// Computes a summary, persists it on the portfolio record, and
    /// appends a valuation tick.
    async fn refresh_valuation(
        &self,
        portfolio_id: &str,
        prices: &PriceMap,
        timestamp: DateTime<Utc>,
    ) -> Result<PortfolioSummary>;
}
