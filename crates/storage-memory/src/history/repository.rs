use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use log::debug;

use coinfolio_core::errors::{Error, Result, ValuationError};
use coinfolio_core::history::{
    HistoricalValuation, ValuationRange, ValuationRepositoryTrait, ValuationStatus,
};

/// In-memory valuation series store, one chronological vector per
/// portfolio.
///
/// Appending a record and demoting the prior `Active` one touch two
/// entries of the same series, so the map sits behind one `RwLock` and
/// `append_and_promote` commits under a single write guard.
#[derive(Default)]
pub struct MemoryValuationRepository {
    series: RwLock<HashMap<String, Vec<HistoricalValuation>>>,
}

impl MemoryValuationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> Error {
        Error::Repository("valuation store lock poisoned".to_string())
    }
}

#[async_trait]
impl ValuationRepositoryTrait for MemoryValuationRepository {
    async fn append_and_promote(
        &self,
        valuation: HistoricalValuation,
    ) -> Result<HistoricalValuation> {
        let mut series_map = self.series.write().map_err(|_| Self::lock_poisoned())?;
        let series = series_map
            .entry(valuation.portfolio_id.clone())
            .or_default();

        if let Some(index) = series
            .iter()
            .position(|v| v.timestamp == valuation.timestamp)
        {
            return match series[index].status {
                // HISTORICAL records are immutable forever.
                ValuationStatus::Historical => Err(ValuationError::DuplicateTimestamp {
                    portfolio_id: valuation.portfolio_id.clone(),
                    timestamp: valuation.timestamp,
                }
                .into()),
                // Only the current ACTIVE record may be overwritten.
                ValuationStatus::Active => {
                    series[index].value = valuation.value;
                    Ok(series[index].clone())
                }
                // A real observation displaces a projection at the same
                // instant; promotion of the prior ACTIVE still applies.
                ValuationStatus::Projected => {
                    series[index].value = valuation.value;
                    series[index].status = ValuationStatus::Active;
                    series[index].id = valuation.id.clone();
                    demote_other_active(series, &valuation.id);
                    Ok(series[index].clone())
                }
            };
        }

        let active_timestamp = series
            .iter()
            .find(|v| v.status == ValuationStatus::Active)
            .map(|v| v.timestamp);

        let mut record = valuation;
        match active_timestamp {
            // A tick older than the current ACTIVE record is a backfill:
            // it lands directly as HISTORICAL, the ACTIVE one stays "now".
            Some(active_ts) if record.timestamp < active_ts => {
                debug!(
                    "Backfilling valuation for portfolio {} at {}",
                    record.portfolio_id, record.timestamp
                );
                record.status = ValuationStatus::Historical;
            }
            _ => {
                record.status = ValuationStatus::Active;
                for existing in series.iter_mut() {
                    if existing.status == ValuationStatus::Active {
                        existing.status = ValuationStatus::Historical;
                    }
                }
            }
        }

        series.push(record.clone());
        series.sort_by_key(|v| v.timestamp);
        Ok(record)
    }

    async fn upsert_projection(
        &self,
        valuation: HistoricalValuation,
    ) -> Result<HistoricalValuation> {
        let mut series_map = self.series.write().map_err(|_| Self::lock_poisoned())?;
        let series = series_map
            .entry(valuation.portfolio_id.clone())
            .or_default();

        if let Some(existing) = series
            .iter_mut()
            .find(|v| v.timestamp == valuation.timestamp)
        {
            // Projections never displace real records.
            if existing.status != ValuationStatus::Projected {
                return Err(ValuationError::DuplicateTimestamp {
                    portfolio_id: valuation.portfolio_id.clone(),
                    timestamp: valuation.timestamp,
                }
                .into());
            }
            existing.value = valuation.value;
            return Ok(existing.clone());
        }

        let mut record = valuation;
        record.status = ValuationStatus::Projected;
        series.push(record.clone());
        series.sort_by_key(|v| v.timestamp);
        Ok(record)
    }

    fn get_series(
        &self,
        portfolio_id: &str,
        range: ValuationRange,
        status: Option<ValuationStatus>,
    ) -> Result<Vec<HistoricalValuation>> {
        let series_map = self.series.read().map_err(|_| Self::lock_poisoned())?;
        Ok(series_map
            .get(portfolio_id)
            .map(|series| {
                series
                    .iter()
                    .filter(|v| range.contains(v.timestamp))
                    .filter(|v| status.map_or(true, |s| v.status == s))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_active(&self, portfolio_id: &str) -> Result<Option<HistoricalValuation>> {
        let series_map = self.series.read().map_err(|_| Self::lock_poisoned())?;
        Ok(series_map.get(portfolio_id).and_then(|series| {
            series
                .iter()
                .find(|v| v.status == ValuationStatus::Active)
                .cloned()
        }))
    }

    async fn delete_for_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut series_map = self.series.write().map_err(|_| Self::lock_poisoned())?;
        Ok(series_map
            .remove(portfolio_id)
            .map_or(0, |series| series.len()))
    }
}

/// Demotes any ACTIVE record other than `keep_id` to HISTORICAL.
fn demote_other_active(series: &mut [HistoricalValuation], keep_id: &str) {
    for record in series.iter_mut() {
        if record.status == ValuationStatus::Active && record.id != keep_id {
            record.status = ValuationStatus::Historical;
        }
    }
}
