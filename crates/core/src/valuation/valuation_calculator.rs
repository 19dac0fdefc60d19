//! Position valuator: current value, unrealized P&L, and return percentage
//! from a position's order ledger and a caller-supplied price map.
//!
//! Pure functions over immutable inputs. The valuator never waits on a
//! price source; callers resolve prices first and pass the finished map.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;
use rust_decimal::Decimal;

use crate::constants::{DECIMAL_PRECISION, PERCENT_PRECISION};
use crate::errors::{Error, LedgerError, Result};
use crate::positions::{
    average_entry_price, is_size_significant, net_filled_size, total_invested, Order, Position,
    TradeSide,
};
use crate::valuation::valuation_model::{PositionValuation, SortDirection, SortField};

/// Map from ticker symbol to current price. Absent entries mean "unknown",
/// not zero: callers must not drop tickers they cannot price silently.
pub type PriceMap = HashMap<String, Decimal>;

/// Values a position against the supplied prices.
///
/// A missing price is a defined case, not an error: the position values to
/// zero with `price_missing` set so the row still renders. A closed
/// position is valued like any other, its last known orders produce the
/// final frozen figures. `InvalidOrderState` from the ledger propagates
/// unchanged; it signals corrupt upstream data.
pub fn valuate_position(position: &Position, prices: &PriceMap) -> Result<PositionValuation> {
    let price = prices.get(&position.asset.ticker).copied();
    if price.is_none() {
        debug!(
            "No price for ticker {}; position {} valued at zero",
            position.asset.ticker, position.id
        );
    }

    let cost_basis = total_invested(position)?;

    let (filled_size, size_indeterminate) = match net_filled_size(position, price) {
        Ok(size) => (size, false),
        // Recoverable by policy: report a zero size but keep the condition
        // observable through the flag.
        Err(Error::Ledger(LedgerError::InsufficientData { order_id, unit })) => {
            debug!(
                "Size of position {} indeterminate ({} order {}); valued at zero",
                position.id, unit, order_id
            );
            (Decimal::ZERO, true)
        }
        Err(e) => return Err(e),
    };

    let average_entry = average_entry_price(cost_basis, filled_size);
    let market_value = current_value(filled_size, price);
    let pnl = unrealized_pnl(position.side(), average_entry, filled_size, price);
    let pct_return = percentage_return(pnl, cost_basis);

    Ok(PositionValuation {
        position_id: position.id.clone(),
        name: position.name.clone(),
        ticker: position.asset.ticker.clone(),
        strategy: position.strategy.clone(),
        risk_level: position.risk_level,
        side: position.side(),
        status: position.position_details.status,
        filled_size,
        average_entry_price: average_entry,
        cost_basis,
        current_price: price,
        market_value,
        unrealized_pnl: pnl,
        percentage_return: pct_return,
        price_missing: price.is_none(),
        size_indeterminate,
        stop_loss_distance_pct: nearest_level_distance(
            price,
            position.position_details.stop_loss.as_deref().map(|s| {
                s.iter().map(|o| &o.order).collect::<Vec<_>>()
            }),
        ),
        take_profit_distance_pct: nearest_level_distance(
            price,
            position.position_details.take_profit.as_deref().map(|s| {
                s.iter().map(|o| &o.order).collect::<Vec<_>>()
            }),
        ),
    })
}

/// Market value magnitude: `|filled_size| × price`, zero when the price is
/// unknown.
pub fn current_value(filled_size: Decimal, price: Option<Decimal>) -> Decimal {
    match price {
        Some(p) => (filled_size.abs() * p).round_dp(DECIMAL_PRECISION),
        None => Decimal::ZERO,
    }
}

/// Unrealized P&L with the sign convention of the position's side.
///
/// Long: `(price − entry) × size`. Short: `(entry − price) × size`.
/// Zero size or unknown price yields zero, not a division error.
pub fn unrealized_pnl(
    side: TradeSide,
    average_entry_price: Decimal,
    filled_size: Decimal,
    price: Option<Decimal>,
) -> Decimal {
    let magnitude = filled_size.abs();
    let Some(price) = price else {
        return Decimal::ZERO;
    };
    if magnitude.is_zero() || !is_size_significant(&magnitude) {
        return Decimal::ZERO;
    }
    let pnl = match side {
        TradeSide::Buy => (price - average_entry_price) * magnitude,
        TradeSide::Sell => (average_entry_price - price) * magnitude,
    };
    pnl.round_dp(DECIMAL_PRECISION)
}

/// Return on invested capital in percent, zero when nothing is invested so
/// NaN never propagates into aggregates.
pub fn percentage_return(pnl: Decimal, total_invested: Decimal) -> Decimal {
    if total_invested.is_zero() {
        return Decimal::ZERO;
    }
    (pnl / total_invested * Decimal::ONE_HUNDRED).round_dp(PERCENT_PRECISION)
}

/// Percent distance from the current price to the trigger nearest to it.
/// Negative when the level sits below the price.
fn nearest_level_distance(price: Option<Decimal>, orders: Option<Vec<&Order>>) -> Option<Decimal> {
    let price = price.filter(|p| !p.is_zero())?;
    let orders = orders?;
    orders
        .iter()
        .filter_map(|o| o.trigger)
        .map(|trigger| (trigger - price) / price * Decimal::ONE_HUNDRED)
        .min_by_key(|d| d.abs())
        .map(|d| d.round_dp(PERCENT_PRECISION))
}

/// Stable multi-field sort over valuations.
///
/// String fields compare case-insensitively; numeric fields compare
/// numerically. Ties keep insertion order (the sort is stable by
/// requirement, any consumer listing positions relies on it).
pub fn sort_valuations(
    valuations: &mut [PositionValuation],
    field: SortField,
    direction: SortDirection,
) {
    valuations.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_by_field(a: &PositionValuation, b: &PositionValuation, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::Ticker => compare_text(&a.ticker, &b.ticker),
        SortField::Strategy => compare_text(&a.strategy, &b.strategy),
        SortField::RiskLevel => a.risk_level.cmp(&b.risk_level),
        SortField::Value => a.market_value.cmp(&b.market_value),
        SortField::Pnl => a.unrealized_pnl.cmp(&b.unrealized_pnl),
    }
}

/// Case-insensitive text comparison. Equal-ignoring-case strings compare
/// equal so the stable sort keeps their insertion order.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
