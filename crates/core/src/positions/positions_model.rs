//! Position, order, and asset domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{PositionError, Result, ValidationError};
use crate::temporal::TemporalValue;

/// Lifecycle state of an order within a position.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Submitted,
    Filled,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OrderType {
    Trigger,
    Market,
    Limit,
}

/// Denomination of a size or fee figure.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SizeUnit {
    Percentage,
    Base,
    Quote,
}

/// An order size together with its denomination.
///
/// The numeric payload travels with the tag so that unit conversion is
/// exhaustive-checked instead of relying on string comparison.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "unit", content = "amount", rename_all = "camelCase")]
pub enum OrderSize {
    /// Fraction of the position, 0 < amount <= 1.
    Percentage(Decimal),
    /// Absolute amount in base-asset units.
    Base(Decimal),
    /// Absolute amount in quote-currency units.
    Quote(Decimal),
}

impl OrderSize {
    /// Builds a percentage size, rejecting values outside (0, 1].
    pub fn percentage(amount: Decimal) -> Result<Self> {
        if amount <= Decimal::ZERO || amount > Decimal::ONE {
            return Err(ValidationError::PercentageOutOfRange(amount).into());
        }
        Ok(OrderSize::Percentage(amount))
    }

    pub fn unit(&self) -> SizeUnit {
        match self {
            OrderSize::Percentage(_) => SizeUnit::Percentage,
            OrderSize::Base(_) => SizeUnit::Base,
            OrderSize::Quote(_) => SizeUnit::Quote,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            OrderSize::Percentage(a) | OrderSize::Base(a) | OrderSize::Quote(a) => *a,
        }
    }
}

/// A fee amount, or a marker that the fee predates tracking.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Fee {
    /// The fee was paid before tracking began; its amount is unknown.
    Genesis,
    Amount(Decimal),
}

/// One planned or executed transaction within a position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub date_open: TemporalValue,
    /// Average execution price. Only meaningful when `status` is `Filled`.
    pub average_price: Option<Decimal>,
    /// Total capital spent on this order. Only meaningful when `status` is `Filled`.
    pub total_cost: Option<Decimal>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub fee: Option<Fee>,
    pub fee_unit: Option<SizeUnit>,
    /// Executed size together with its denomination.
    pub filled: Option<OrderSize>,
    /// Price level that activates a trigger order.
    pub trigger: Option<Decimal>,
    /// Projected cost of a not-yet-filled order.
    pub estimated_cost: Option<Decimal>,
}

impl Order {
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}

/// A stop-loss order: an order with a mandatory size defining the risk bound.
///
/// Stop levels do not affect current-value computation; they exist for
/// distance-to-level reporting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopLossOrder {
    #[serde(flatten)]
    pub order: Order,
    pub size: OrderSize,
}

/// A take-profit order: an order with a mandatory size defining the target bound.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TakeProfitOrder {
    #[serde(flatten)]
    pub order: Order,
    pub size: OrderSize,
}

/// Where an asset is custodied.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AssetLocation {
    Exchange,
    ColdStorage,
}

/// Identifies what is priced and where it lives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    /// Ticker symbol used to look the asset up in a price map.
    pub ticker: String,
    /// Trading pair the asset is quoted in, e.g. "BTC/USDT".
    pub pair: String,
    pub location: AssetLocation,
    pub exchange: Option<String>,
    pub wallet: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WalletType {
    Hot,
    Cold,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PositionStatus {
    Active,
    Closed,
}

/// Direction of a position. A `Sell` (short) position inverts the P&L sign
/// convention relative to price movement.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Execution details of a position: lifecycle, direction, and the order book.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionDetails {
    pub status: PositionStatus,
    pub side: TradeSide,
    /// Timeframe tag the trade was planned on (e.g. "1D", "4H").
    pub fractal: String,
    pub transaction_fee: Option<Decimal>,
    pub date_opened: Option<TemporalValue>,
    pub date_closed: Option<TemporalValue>,
    pub orders: Vec<Order>,
    pub stop_loss: Option<Vec<StopLossOrder>>,
    pub take_profit: Option<Vec<TakeProfitOrder>>,
}

impl PositionDetails {
    pub fn is_closed(&self) -> bool {
        self.status == PositionStatus::Closed
    }
}

/// A single directional holding in one asset, with its own orders and risk
/// parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub name: String,
    /// Risk appetite for the trade, 1 (lowest) to 10 (highest).
    pub risk_level: u8,
    /// Id of the portfolio this position belongs to.
    pub portfolio: String,
    pub wallet_type: WalletType,
    /// Provenance tag distinguishing fresh capital from reinvested profits.
    pub seed_capital_tier: String,
    pub strategy: String,
    pub thesis: Option<String>,
    pub journal: Option<String>,
    pub asset: Asset,
    pub position_details: PositionDetails,
}

impl Position {
    /// Checks the structural invariants of a position record.
    ///
    /// A closed position must carry `date_closed`; the risk level must be in
    /// range. This does not inspect individual orders, the ledger does that.
    pub fn validate(&self) -> Result<()> {
        if self.risk_level < 1 || self.risk_level > 10 {
            return Err(ValidationError::RiskLevelOutOfRange(self.risk_level).into());
        }
        if self.position_details.is_closed() && self.position_details.date_closed.is_none() {
            return Err(ValidationError::MissingField("dateClosed".to_string()).into());
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.position_details.is_closed()
    }

    pub fn side(&self) -> TradeSide {
        self.position_details.side
    }

    /// Appends an order. Closed positions are frozen and reject mutation.
    pub fn add_order(&mut self, order: Order) -> Result<()> {
        if self.is_closed() {
            return Err(PositionError::Closed(self.id.clone()).into());
        }
        self.position_details.orders.push(order);
        Ok(())
    }

    /// Marks the position closed. One-directional: there is no transition
    /// back to active.
    pub fn close(&mut self, date_closed: DateTime<Utc>) -> Result<()> {
        if self.is_closed() {
            return Err(PositionError::Closed(self.id.clone()).into());
        }
        self.position_details.status = PositionStatus::Closed;
        self.position_details.date_closed = Some(TemporalValue::At(date_closed));
        Ok(())
    }
}
