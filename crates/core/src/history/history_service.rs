use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::history_model::{
    Bucket, BucketPoint, HistoricalValuation, ValuationRange, ValuationStatus,
};
use super::history_traits::{ValuationHistoryServiceTrait, ValuationRepositoryTrait};
use crate::errors::Result;
use crate::utils::time_utils::bucket_start;

/// Service maintaining the append-mostly valuation time series.
pub struct ValuationHistoryService {
    repository: Arc<dyn ValuationRepositoryTrait>,
}

impl ValuationHistoryService {
    pub fn new(repository: Arc<dyn ValuationRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Lazy, chronologically ordered view of the series. Finite and
    /// restartable: every call re-executes the underlying query, no cursor
    /// state survives between calls.
    pub fn query_iter(
        &self,
        portfolio_id: &str,
        range: ValuationRange,
        status: Option<ValuationStatus>,
    ) -> Result<impl Iterator<Item = HistoricalValuation>> {
        Ok(self
            .repository
            .get_series(portfolio_id, range, status)?
            .into_iter())
    }
}

#[async_trait]
impl ValuationHistoryServiceTrait for ValuationHistoryService {
    async fn record_valuation(
        &self,
        portfolio_id: &str,
        value: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<HistoricalValuation> {
        debug!(
            "Recording valuation {} for portfolio {} at {}",
            value, portfolio_id, timestamp
        );
        self.repository
            .append_and_promote(HistoricalValuation {
                id: format!("{}_{}", portfolio_id, timestamp.timestamp()),
                portfolio_id: portfolio_id.to_string(),
                value,
                timestamp,
                status: ValuationStatus::Active,
            })
            .await
    }

    async fn record_projection(
        &self,
        portfolio_id: &str,
        value: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<HistoricalValuation> {
        self.repository
            .upsert_projection(HistoricalValuation {
                id: format!("{}_{}_proj", portfolio_id, timestamp.timestamp()),
                portfolio_id: portfolio_id.to_string(),
                value,
                timestamp,
                status: ValuationStatus::Projected,
            })
            .await
    }

    fn query(
        &self,
        portfolio_id: &str,
        range: ValuationRange,
        status: Option<ValuationStatus>,
    ) -> Result<Vec<HistoricalValuation>> {
        self.repository.get_series(portfolio_id, range, status)
    }
}

/// Groups a series into buckets, each represented by the last value
/// observed within it. Input order does not matter; the output is sorted
/// by bucket start.
pub fn aggregate_series(
    series: impl IntoIterator<Item = HistoricalValuation>,
    bucket: Bucket,
) -> Vec<BucketPoint> {
    let mut sorted: Vec<HistoricalValuation> = series.into_iter().collect();
    sorted.sort_by_key(|v| v.timestamp);

    let mut points: Vec<BucketPoint> = Vec::new();
    for valuation in sorted {
        let period_start = bucket_start(valuation.timestamp.date_naive(), bucket);
        match points.last_mut() {
            // Later observation in the same bucket replaces the earlier one.
            Some(last) if last.period_start == period_start => last.value = valuation.value,
            _ => points.push(BucketPoint {
                period_start,
                value: valuation.value,
            }),
        }
    }
    points
}
