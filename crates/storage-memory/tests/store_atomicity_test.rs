//! Integration tests for the in-memory stores, focused on the ordering
//! guarantees of the persistence contract.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use coinfolio_core::errors::{Error, ValuationError};
use coinfolio_core::history::{
    HistoricalValuation, ValuationRange, ValuationRepositoryTrait, ValuationStatus,
};
use coinfolio_core::portfolios::{NewPortfolio, PortfolioRepositoryTrait};
use coinfolio_storage_memory::{MemoryPortfolioRepository, MemoryValuationRepository};

fn valuation(portfolio_id: &str, day: u32, value: rust_decimal::Decimal) -> HistoricalValuation {
    let timestamp = Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
    HistoricalValuation {
        id: format!("{}_{}", portfolio_id, timestamp.timestamp()),
        portfolio_id: portfolio_id.to_string(),
        value,
        timestamp,
        status: ValuationStatus::Active,
    }
}

fn new_portfolio(id: &str, user_id: &str) -> NewPortfolio {
    NewPortfolio {
        id: Some(id.to_string()),
        name: format!("Portfolio {}", id),
        user_id: user_id.to_string(),
        ..Default::default()
    }
}

// ============================================================================
// Valuation series
// ============================================================================

#[tokio::test]
async fn each_tick_leaves_exactly_one_active_record() {
    let repo = MemoryValuationRepository::new();

    repo.append_and_promote(valuation("pf-1", 1, dec!(100)))
        .await
        .unwrap();
    repo.append_and_promote(valuation("pf-1", 2, dec!(110)))
        .await
        .unwrap();
    repo.append_and_promote(valuation("pf-1", 3, dec!(120)))
        .await
        .unwrap();

    let series = repo
        .get_series("pf-1", ValuationRange::default(), None)
        .unwrap();
    assert_eq!(series.len(), 3);

    let active: Vec<_> = series
        .iter()
        .filter(|v| v.status == ValuationStatus::Active)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].value, dec!(120));
    // Demoted records are in chronological order and HISTORICAL.
    assert_eq!(series[0].status, ValuationStatus::Historical);
    assert_eq!(series[1].status, ValuationStatus::Historical);
}

#[tokio::test]
async fn appending_at_a_historical_timestamp_fails_with_duplicate_timestamp() {
    let repo = MemoryValuationRepository::new();
    repo.append_and_promote(valuation("pf-1", 1, dec!(100)))
        .await
        .unwrap();
    repo.append_and_promote(valuation("pf-1", 2, dec!(110)))
        .await
        .unwrap();

    // Day 1 has been demoted to HISTORICAL; it is immutable now.
    let result = repo
        .append_and_promote(valuation("pf-1", 1, dec!(999)))
        .await;
    assert!(matches!(
        result,
        Err(Error::Valuation(ValuationError::DuplicateTimestamp { .. }))
    ));

    let series = repo
        .get_series("pf-1", ValuationRange::default(), None)
        .unwrap();
    assert_eq!(series[0].value, dec!(100));
}

#[tokio::test]
async fn appending_at_the_active_timestamp_overwrites_in_place() {
    let repo = MemoryValuationRepository::new();
    repo.append_and_promote(valuation("pf-1", 1, dec!(100)))
        .await
        .unwrap();

    let updated = repo
        .append_and_promote(valuation("pf-1", 1, dec!(105)))
        .await
        .unwrap();
    assert_eq!(updated.value, dec!(105));
    assert_eq!(updated.status, ValuationStatus::Active);

    let series = repo
        .get_series("pf-1", ValuationRange::default(), None)
        .unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].value, dec!(105));
}

#[tokio::test]
async fn backfilled_ticks_land_as_historical_without_touching_the_active_record() {
    let repo = MemoryValuationRepository::new();
    repo.append_and_promote(valuation("pf-1", 5, dec!(150)))
        .await
        .unwrap();

    let backfilled = repo
        .append_and_promote(valuation("pf-1", 2, dec!(90)))
        .await
        .unwrap();
    assert_eq!(backfilled.status, ValuationStatus::Historical);

    let active = repo.get_active("pf-1").unwrap().unwrap();
    assert_eq!(active.value, dec!(150));
}

#[tokio::test]
async fn projections_are_scratch_data_until_a_real_tick_displaces_them() {
    let repo = MemoryValuationRepository::new();
    repo.append_and_promote(valuation("pf-1", 1, dec!(100)))
        .await
        .unwrap();

    let mut projection = valuation("pf-1", 9, dec!(180));
    projection.status = ValuationStatus::Projected;
    repo.upsert_projection(projection.clone()).await.unwrap();

    // Freely overwritten.
    projection.value = dec!(185);
    let stored = repo.upsert_projection(projection).await.unwrap();
    assert_eq!(stored.value, dec!(185));
    assert_eq!(stored.status, ValuationStatus::Projected);

    // A real observation at the projected instant replaces it and becomes
    // the one ACTIVE record.
    repo.append_and_promote(valuation("pf-1", 9, dec!(170)))
        .await
        .unwrap();
    let series = repo
        .get_series("pf-1", ValuationRange::default(), None)
        .unwrap();
    let active: Vec<_> = series
        .iter()
        .filter(|v| v.status == ValuationStatus::Active)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].value, dec!(170));

    // But a projection never displaces a real record.
    let mut clash = valuation("pf-1", 1, dec!(1));
    clash.status = ValuationStatus::Projected;
    assert!(repo.upsert_projection(clash).await.is_err());
}

#[tokio::test]
async fn range_queries_are_chronological_and_restartable() {
    let repo = MemoryValuationRepository::new();
    for day in 1..=5 {
        repo.append_and_promote(valuation("pf-1", day, dec!(100) + rust_decimal::Decimal::from(day)))
            .await
            .unwrap();
    }

    let range = ValuationRange {
        start: Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()),
        end: Some(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()),
    };
    let first = repo.get_series("pf-1", range, None).unwrap();
    let second = repo.get_series("pf-1", range, None).unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

// ============================================================================
// Pinned portfolio
// ============================================================================

#[tokio::test]
async fn pin_switching_leaves_exactly_one_pinned_after_every_call() {
    let repo = MemoryPortfolioRepository::new();
    repo.create(new_portfolio("pf-1", "user-1")).await.unwrap();
    repo.create(new_portfolio("pf-2", "user-1")).await.unwrap();

    repo.set_pinned("user-1", "pf-1").await.unwrap();
    assert_eq!(repo.get_pinned("user-1").unwrap().unwrap().id, "pf-1");

    repo.set_pinned("user-1", "pf-2").await.unwrap();
    let portfolios = repo.list_by_user("user-1").unwrap();
    let pinned: Vec<_> = portfolios.iter().filter(|p| p.is_pinned).collect();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].id, "pf-2");
}

#[tokio::test]
async fn pinning_is_scoped_per_user() {
    let repo = MemoryPortfolioRepository::new();
    repo.create(new_portfolio("pf-1", "user-1")).await.unwrap();
    repo.create(new_portfolio("pf-2", "user-2")).await.unwrap();

    repo.set_pinned("user-1", "pf-1").await.unwrap();
    repo.set_pinned("user-2", "pf-2").await.unwrap();

    assert_eq!(repo.get_pinned("user-1").unwrap().unwrap().id, "pf-1");
    assert_eq!(repo.get_pinned("user-2").unwrap().unwrap().id, "pf-2");

    // Pinning someone else's portfolio is a NotFound, not a cross-user pin.
    assert!(repo.set_pinned("user-1", "pf-2").await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_pin_switches_never_expose_a_torn_state() {
    let repo = Arc::new(MemoryPortfolioRepository::new());
    repo.create(new_portfolio("pf-1", "user-1")).await.unwrap();
    repo.create(new_portfolio("pf-2", "user-1")).await.unwrap();
    repo.set_pinned("user-1", "pf-1").await.unwrap();

    let mut handles = Vec::new();
    for writer in 0..2 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            let target = if writer == 0 { "pf-1" } else { "pf-2" };
            for _ in 0..200 {
                repo.set_pinned("user-1", target).await.unwrap();
            }
        }));
    }
    for _ in 0..2 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..500 {
                let pinned = repo
                    .list_by_user("user-1")
                    .unwrap()
                    .into_iter()
                    .filter(|p| p.is_pinned)
                    .count();
                // Fully before or fully after, never zero or two.
                assert_eq!(pinned, 1);
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn updated_at_moves_when_the_pin_moves() {
    let repo = MemoryPortfolioRepository::new();
    let created = repo.create(new_portfolio("pf-1", "user-1")).await.unwrap();
    // A later pin switch must bump the record's update time.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let pinned = repo.set_pinned("user-1", "pf-1").await.unwrap();
    assert!(pinned.updated_at > created.updated_at);
    assert!(pinned.is_pinned);
}
