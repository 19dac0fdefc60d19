//! Position valuation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::positions::{PositionStatus, TradeSide};

/// Per-position valuation result.
///
/// The `price_missing` and `size_indeterminate` flags make degraded inputs
/// observable: the row still renders with zero values, but aggregates built
/// from it must be marked partial rather than presented as exact.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub position_id: String,
    pub name: String,
    pub ticker: String,
    pub strategy: String,
    pub risk_level: u8,
    pub side: TradeSide,
    pub status: PositionStatus,
    /// Signed net filled size in base units (buy positive, sell negative).
    pub filled_size: Decimal,
    pub average_entry_price: Decimal,
    /// Total invested capital (cost basis) of filled orders.
    pub cost_basis: Decimal,
    pub current_price: Option<Decimal>,
    /// Market value magnitude; direction is carried by `side`.
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub percentage_return: Decimal,
    /// No price was supplied for the ticker; value fields are zero by policy.
    pub price_missing: bool,
    /// The filled size could not be normalized (percentage/quote sizes with
    /// no usable price); value fields are zero by policy.
    pub size_indeterminate: bool,
    /// Percent distance from the current price to the nearest stop-loss
    /// trigger, negative when the level is below the price.
    pub stop_loss_distance_pct: Option<Decimal>,
    /// Percent distance from the current price to the nearest take-profit
    /// trigger.
    pub take_profit_distance_pct: Option<Decimal>,
}

impl PositionValuation {
    /// True when any input needed for an exact figure was unavailable.
    pub fn is_incomplete(&self) -> bool {
        self.price_missing || self.size_indeterminate
    }
}

/// Field a list of valuations can be sorted on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Ticker,
    Strategy,
    RiskLevel,
    Value,
    Pnl,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}
