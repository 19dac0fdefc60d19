//! Unit tests for the valuation history service and series aggregation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use super::*;
use crate::errors::Result;

/// Mock repository that stores records in insertion order and counts
/// queries, so restartability is observable.
struct MockValuationRepository {
    records: Mutex<Vec<HistoricalValuation>>,
    query_count: Mutex<usize>,
}

impl MockValuationRepository {
    fn new(records: Vec<HistoricalValuation>) -> Self {
        Self {
            records: Mutex::new(records),
            query_count: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ValuationRepositoryTrait for MockValuationRepository {
    async fn append_and_promote(
        &self,
        valuation: HistoricalValuation,
    ) -> Result<HistoricalValuation> {
        let mut records = self.records.lock().unwrap();
        for existing in records.iter_mut() {
            if existing.status == ValuationStatus::Active {
                existing.status = ValuationStatus::Historical;
            }
        }
        records.push(valuation.clone());
        Ok(valuation)
    }

    async fn upsert_projection(
        &self,
        valuation: HistoricalValuation,
    ) -> Result<HistoricalValuation> {
        self.records.lock().unwrap().push(valuation.clone());
        Ok(valuation)
    }

    fn get_series(
        &self,
        portfolio_id: &str,
        range: ValuationRange,
        status: Option<ValuationStatus>,
    ) -> Result<Vec<HistoricalValuation>> {
        *self.query_count.lock().unwrap() += 1;
        let mut series: Vec<HistoricalValuation> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.portfolio_id == portfolio_id)
            .filter(|v| range.contains(v.timestamp))
            .filter(|v| status.map_or(true, |s| v.status == s))
            .cloned()
            .collect();
        series.sort_by_key(|v| v.timestamp);
        Ok(series)
    }

    fn get_active(&self, portfolio_id: &str) -> Result<Option<HistoricalValuation>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.portfolio_id == portfolio_id && v.status == ValuationStatus::Active)
            .cloned())
    }

    async fn delete_for_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|v| v.portfolio_id != portfolio_id);
        Ok(before - records.len())
    }
}

fn valuation(day: u32, value: rust_decimal::Decimal, status: ValuationStatus) -> HistoricalValuation {
    let timestamp = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
    HistoricalValuation {
        id: format!("pf-1_{}", timestamp.timestamp()),
        portfolio_id: "pf-1".to_string(),
        value,
        timestamp,
        status,
    }
}

#[tokio::test]
async fn recording_a_tick_demotes_the_previous_active_record() {
    let repo = Arc::new(MockValuationRepository::new(vec![valuation(
        1,
        dec!(100),
        ValuationStatus::Active,
    )]));
    let service = ValuationHistoryService::new(repo.clone());

    let tick_time = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
    service
        .record_valuation("pf-1", dec!(110), tick_time)
        .await
        .unwrap();

    let series = repo
        .get_series("pf-1", ValuationRange::default(), None)
        .unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].status, ValuationStatus::Historical);
    assert_eq!(series[1].status, ValuationStatus::Active);
    assert_eq!(series[1].value, dec!(110));
}

#[tokio::test]
async fn query_iter_re_executes_on_every_call() {
    let repo = Arc::new(MockValuationRepository::new(vec![
        valuation(1, dec!(100), ValuationStatus::Historical),
        valuation(2, dec!(110), ValuationStatus::Active),
    ]));
    let service = ValuationHistoryService::new(repo.clone());

    let first: Vec<_> = service
        .query_iter("pf-1", ValuationRange::default(), None)
        .unwrap()
        .collect();
    let second: Vec<_> = service
        .query_iter("pf-1", ValuationRange::default(), None)
        .unwrap()
        .collect();

    assert_eq!(first, second);
    assert_eq!(*repo.query_count.lock().unwrap(), 2);
    // Chronological order.
    assert!(first[0].timestamp < first[1].timestamp);
}

#[tokio::test]
async fn query_filters_by_range_and_status() {
    let repo = Arc::new(MockValuationRepository::new(vec![
        valuation(1, dec!(100), ValuationStatus::Historical),
        valuation(2, dec!(110), ValuationStatus::Historical),
        valuation(3, dec!(120), ValuationStatus::Active),
        valuation(4, dec!(130), ValuationStatus::Projected),
    ]));
    let service = ValuationHistoryService::new(repo);

    let range = ValuationRange {
        start: Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()),
        end: None,
    };
    let historical = service
        .query("pf-1", range, Some(ValuationStatus::Historical))
        .unwrap();
    assert_eq!(historical.len(), 1);
    assert_eq!(historical[0].value, dec!(110));
}

#[test]
fn aggregation_takes_the_last_value_in_each_bucket() {
    // Two records on the same day: the later one represents the day.
    let mut morning = valuation(4, dec!(100), ValuationStatus::Historical);
    morning.timestamp = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
    let evening = valuation(4, dec!(105), ValuationStatus::Historical);
    let next_day = valuation(5, dec!(120), ValuationStatus::Active);

    let points = aggregate_series(vec![evening, morning, next_day], Bucket::Day);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].value, dec!(105));
    assert_eq!(points[1].value, dec!(120));
}

#[test]
fn weekly_aggregation_groups_by_monday_start() {
    // 2024-03-04 is a Monday; 03-05 same week; 03-11 the next.
    let series = vec![
        valuation(4, dec!(100), ValuationStatus::Historical),
        valuation(5, dec!(110), ValuationStatus::Historical),
        valuation(11, dec!(130), ValuationStatus::Active),
    ];
    let points = aggregate_series(series, Bucket::Week);
    assert_eq!(points.len(), 2);
    assert_eq!(
        points[0].period_start,
        chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    );
    assert_eq!(points[0].value, dec!(110));
    assert_eq!(points[1].value, dec!(130));
}
