//! Portfolio domain models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named group of positions owned by one user.
///
/// At most one portfolio per user carries `is_pinned = true`; the pinned
/// portfolio is the user's primary view. The storage layer enforces the
/// invariant atomically on pin switches.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub user_id: String,
    /// Last computed total value; refreshed by the aggregator.
    pub total_value: Decimal,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub day_change: Option<Decimal>,
    pub day_change_percent: Option<Decimal>,
    /// Ticker symbols of the largest holdings, value descending.
    pub top_holdings: Option<Vec<String>>,
    pub base_currency: Option<String>,
    pub risk_profile: Option<String>,
    /// Target weight per ticker, for allocation drift display.
    pub target_allocations: Option<HashMap<String, Decimal>>,
    pub initial_investment: Option<Decimal>,
    pub is_public: Option<bool>,
}

/// Payload for creating a portfolio. The id is assigned by storage when
/// absent.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub id: Option<String>,
    pub name: String,
    pub user_id: String,
    pub base_currency: Option<String>,
    pub risk_profile: Option<String>,
    pub target_allocations: Option<HashMap<String, Decimal>>,
    pub initial_investment: Option<Decimal>,
    pub is_public: Option<bool>,
}

/// Partial update for a portfolio record. `None` fields are left unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: String,
    pub name: Option<String>,
    pub total_value: Option<Decimal>,
    pub day_change: Option<Decimal>,
    pub day_change_percent: Option<Decimal>,
    pub top_holdings: Option<Vec<String>>,
    pub base_currency: Option<String>,
    pub risk_profile: Option<String>,
    pub target_allocations: Option<HashMap<String, Decimal>>,
    pub initial_investment: Option<Decimal>,
    pub is_public: Option<bool>,
}

/// Day-over-day change of a portfolio's value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayChange {
    pub amount: Decimal,
    pub percent: Decimal,
    /// Set when no valuation existed ~24h prior and an older record was
    /// used instead. Consumers may suppress display rather than show a
    /// misleading percentage.
    pub approximate: bool,
}

/// Roll-up of a portfolio's positions and valuation history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub portfolio_id: String,
    /// Sum of current value over active positions.
    pub total_value: Decimal,
    /// Unrealized P&L across active positions.
    pub unrealized_pnl: Decimal,
    /// Frozen P&L of closed positions, reported separately; it is never
    /// folded back into the current-value sum.
    pub realized_pnl: Decimal,
    /// True when any position valued with missing or indeterminate data,
    /// so the totals are a lower bound rather than exact.
    pub partial: bool,
    pub day_change: Option<DayChange>,
    pub top_holdings: Vec<String>,
}
