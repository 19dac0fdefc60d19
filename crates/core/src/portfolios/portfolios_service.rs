//! Portfolio aggregator: rolls positions and the valuation series up into
//! portfolio-level figures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use super::portfolios_model::{
    DayChange, NewPortfolio, Portfolio, PortfolioSummary, PortfolioUpdate,
};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::constants::{DAY_CHANGE_LOOKBACK_HOURS, DAY_CHANGE_STALE_HOURS, PERCENT_PRECISION};
use crate::errors::Result;
use crate::history::{
    HistoricalValuation, ValuationHistoryServiceTrait, ValuationRange, ValuationRepositoryTrait,
    ValuationStatus,
};
use crate::positions::{PositionRepositoryTrait, PositionStatus};
use crate::valuation::{valuate_position, PositionValuation, PriceMap};

/// Day-over-day change from a chronological valuation series.
///
/// The comparison record is the latest one at least 24h older than the
/// newest record. When the series has a gap there, the earliest record
/// strictly before the newest one is used instead and the result is
/// flagged approximate. Projected records never participate.
pub fn compute_day_change(series: &[HistoricalValuation]) -> Option<DayChange> {
    let mut real: Vec<&HistoricalValuation> = series
        .iter()
        .filter(|v| v.status != ValuationStatus::Projected)
        .collect();
    real.sort_by_key(|v| v.timestamp);

    let latest = *real.last()?;
    let target = latest.timestamp - Duration::hours(DAY_CHANGE_LOOKBACK_HOURS);

    let (prior, approximate) = match real
        .iter()
        .rev()
        .find(|v| v.timestamp <= target)
    {
        Some(prior) => {
            let stale =
                prior.timestamp < latest.timestamp - Duration::hours(DAY_CHANGE_STALE_HOURS);
            (*prior, stale)
        }
        None => {
            let earliest = *real.first()?;
            if earliest.timestamp >= latest.timestamp {
                // Single-record series: nothing to compare against.
                return None;
            }
            (earliest, true)
        }
    };

    let amount = latest.value - prior.value;
    let percent = if prior.value.is_zero() {
        Decimal::ZERO
    } else {
        (amount / prior.value * Decimal::ONE_HUNDRED).round_dp(PERCENT_PRECISION)
    };

    Some(DayChange {
        amount,
        percent,
        approximate,
    })
}

/// Ranks valuations by current value descending, ties broken by ticker
/// ascending, and returns the top `n` ticker symbols.
pub fn rank_top_holdings(valuations: &[PositionValuation], n: usize) -> Vec<String> {
    let mut ranked: Vec<&PositionValuation> = valuations.iter().collect();
    ranked.sort_by(|a, b| {
        b.market_value
            .cmp(&a.market_value)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    ranked.into_iter().take(n).map(|v| v.ticker.clone()).collect()
}

/// Service for portfolio aggregation and lifecycle.
pub struct PortfolioService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    valuation_repository: Arc<dyn ValuationRepositoryTrait>,
    history_service: Arc<dyn ValuationHistoryServiceTrait>,
}

impl PortfolioService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        valuation_repository: Arc<dyn ValuationRepositoryTrait>,
        history_service: Arc<dyn ValuationHistoryServiceTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            position_repository,
            valuation_repository,
            history_service,
        }
    }

    /// Values every position of the portfolio against the supplied prices.
    fn valuate_positions(
        &self,
        portfolio_id: &str,
        prices: &PriceMap,
    ) -> Result<Vec<PositionValuation>> {
        let positions = self.position_repository.list_by_portfolio(portfolio_id)?;
        positions
            .iter()
            .map(|p| valuate_position(p, prices))
            .collect()
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        debug!("Creating portfolio '{}' for user {}", new_portfolio.name, new_portfolio.user_id);
        self.portfolio_repository.create(new_portfolio).await
    }

    async fn update_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio> {
        self.portfolio_repository.update(update).await
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        // Aggregate deletion: the record, its positions, and its series go
        // together; nothing is ever partially deleted.
        let removed_positions = self
            .position_repository
            .delete_by_portfolio(portfolio_id)
            .await?;
        let removed_valuations = self
            .valuation_repository
            .delete_for_portfolio(portfolio_id)
            .await?;
        self.portfolio_repository.delete(portfolio_id).await?;
        debug!(
            "Deleted portfolio {} with {} positions and {} valuations",
            portfolio_id, removed_positions, removed_valuations
        );
        Ok(())
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.portfolio_repository.get_by_id(portfolio_id)
    }

    fn list_portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        self.portfolio_repository.list_by_user(user_id)
    }

    fn compute_summary(&self, portfolio_id: &str, prices: &PriceMap) -> Result<PortfolioSummary> {
        let valuations = self.valuate_positions(portfolio_id, prices)?;

        let mut total_value = Decimal::ZERO;
        let mut unrealized_pnl = Decimal::ZERO;
        let mut realized_pnl = Decimal::ZERO;
        let mut partial = false;

        for valuation in &valuations {
            partial |= valuation.is_incomplete();
            match valuation.status {
                PositionStatus::Active => {
                    total_value += valuation.market_value;
                    unrealized_pnl += valuation.unrealized_pnl;
                }
                // Closed positions contribute nothing to current value;
                // their frozen P&L is reported on its own.
                PositionStatus::Closed => realized_pnl += valuation.unrealized_pnl,
            }
        }

        if partial {
            warn!(
                "Summary for portfolio {} is partial: some positions lacked price or size data",
                portfolio_id
            );
        }

        let series = self.valuation_repository.get_series(
            portfolio_id,
            ValuationRange::default(),
            None,
        )?;

        let active: Vec<PositionValuation> = valuations
            .into_iter()
            .filter(|v| v.status == PositionStatus::Active)
            .collect();

        Ok(PortfolioSummary {
            portfolio_id: portfolio_id.to_string(),
            total_value,
            unrealized_pnl,
            realized_pnl,
            partial,
            day_change: compute_day_change(&series),
            top_holdings: rank_top_holdings(&active, crate::constants::DEFAULT_TOP_HOLDINGS),
        })
    }

    fn top_holdings(
        &self,
        portfolio_id: &str,
        prices: &PriceMap,
        n: usize,
    ) -> Result<Vec<String>> {
        let valuations: Vec<PositionValuation> = self
            .valuate_positions(portfolio_id, prices)?
            .into_iter()
            .filter(|v| v.status == PositionStatus::Active)
            .collect();
        Ok(rank_top_holdings(&valuations, n))
    }

    async fn set_pinned_portfolio(&self, user_id: &str, portfolio_id: &str) -> Result<Portfolio> {
        // Unpin-then-pin runs inside the repository as one atomic unit;
        // the service only delegates.
        self.portfolio_repository
            .set_pinned(user_id, portfolio_id)
            .await
    }

    async fn refresh_valuation(
        &self,
        portfolio_id: &str,
        prices: &PriceMap,
        timestamp: DateTime<Utc>,
    ) -> Result<PortfolioSummary> {
        let mut summary = self.compute_summary(portfolio_id, prices)?;

        self.history_service
            .record_valuation(portfolio_id, summary.total_value, timestamp)
            .await?;

        // Recompute the day change now that the new tick is part of the
        // series, so the persisted figures compare against it.
        let series = self.valuation_repository.get_series(
            portfolio_id,
            ValuationRange::default(),
            None,
        )?;
        summary.day_change = compute_day_change(&series);

        self.portfolio_repository
            .update(PortfolioUpdate {
                id: portfolio_id.to_string(),
                total_value: Some(summary.total_value),
                day_change: summary.day_change.as_ref().map(|d| d.amount),
                day_change_percent: summary.day_change.as_ref().map(|d| d.percent),
                top_holdings: Some(summary.top_holdings.clone()),
                ..Default::default()
            })
            .await?;

        Ok(summary)
    }
}
