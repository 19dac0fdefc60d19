//! Repository and service traits for the historical valuation series.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::history_model::{HistoricalValuation, ValuationRange, ValuationStatus};
use crate::errors::Result;

/// Storage contract for valuation records.
///
/// `append_and_promote` is the boundary contract of the series: inserting
/// the new `Active` record and demoting the previous one must be a single
/// atomic operation visible to readers either fully before or fully after.
/// The core assumes this guarantee and does not re-check it.
#[async_trait]
pub trait ValuationRepositoryTrait: Send + Sync {
    /// Atomically appends a new `Active` record, demoting the current one
    /// to `Historical`.
    ///
    /// Fails with `DuplicateTimestamp` when a `Historical` record already
    /// occupies `(portfolio_id, timestamp)`. A write at the current
    /// `Active` record's timestamp overwrites it in place.
    async fn append_and_promote(&self, valuation: HistoricalValuation)
        -> Result<HistoricalValuation>;

    /// Inserts or replaces a `Projected` record. Projections are scratch
    /// data: freely overwritten, and displaced by a real append at the
    /// same timestamp.
    async fn upsert_projection(&self, valuation: HistoricalValuation)
        -> Result<HistoricalValuation>;

    /// Chronologically ordered records for a portfolio, optionally
    /// filtered. Each call re-executes the query; no cursor state
    /// survives between calls.
    fn get_series(
        &self,
        portfolio_id: &str,
        range: ValuationRange,
        status: Option<ValuationStatus>,
    ) -> Result<Vec<HistoricalValuation>>;

    /// The current `Active` record, if the portfolio has any history.
    fn get_active(&self, portfolio_id: &str) -> Result<Option<HistoricalValuation>>;

    /// Removes the whole series for a portfolio (aggregate deletion only).
    async fn delete_for_portfolio(&self, portfolio_id: &str) -> Result<usize>;
}

/// Service contract for maintaining and querying the series.
#[async_trait]
pub trait ValuationHistoryServiceTrait: Send + Sync {
    /// Records one valuation tick for a portfolio.
    async fn record_valuation(
        &self,
        portfolio_id: &str,
        value: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<HistoricalValuation>;

    /// Records a projected (future) value for trend display.
    async fn record_projection(
        &self,
        portfolio_id: &str,
        value: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<HistoricalValuation>;

    fn query(
        &self,
        portfolio_id: &str,
        range: ValuationRange,
        status: Option<ValuationStatus>,
    ) -> Result<Vec<HistoricalValuation>>;
}
