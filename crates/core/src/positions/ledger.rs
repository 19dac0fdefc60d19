//! Order ledger: derives invested capital and net filled size from a
//! position's order list.
//!
//! Only `Filled` orders contribute; `Submitted` and `Cancelled` orders are
//! inert for cost basis and size. All functions are pure and synchronous.

use log::warn;
use rust_decimal::Decimal;

use crate::constants::QUANTITY_THRESHOLD;
use crate::errors::{LedgerError, Result};
use crate::positions::positions_model::{Order, OrderSize, OrderStatus, Position, TradeSide};

/// True when a filled size is large enough to matter (above the dust
/// threshold).
pub fn is_size_significant(size: &Decimal) -> bool {
    let threshold =
        Decimal::from_str_radix(QUANTITY_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 8));
    size.abs() >= threshold
}

/// Total capital spent on filled orders.
///
/// Returns zero when no orders have filled. A `Filled` order without a
/// `total_cost` is corrupt data and fails loudly rather than being counted
/// as zero.
pub fn total_invested(position: &Position) -> Result<Decimal> {
    let mut invested = Decimal::ZERO;
    for order in filled_orders(position) {
        match order.total_cost {
            Some(cost) => invested += cost,
            None => {
                return Err(LedgerError::InvalidOrderState {
                    order_id: order.id.clone(),
                    field: "totalCost",
                }
                .into())
            }
        }
    }
    Ok(invested)
}

/// Capital committed but not yet invested: `estimated_cost` of submitted
/// orders, reported separately from `total_invested` so the two figures are
/// never mixed.
pub fn committed_capital(position: &Position) -> Result<Decimal> {
    let pending: Decimal = position
        .position_details
        .orders
        .iter()
        .filter(|o| o.status == OrderStatus::Submitted)
        .filter_map(|o| o.estimated_cost)
        .sum();
    Ok(total_invested(position)? + pending)
}

/// Signed net filled size in base-asset units.
///
/// Buy positions are positive, sell (short) positions negative. Sizes
/// denominated in quote currency or as a percentage are normalized against
/// `reference_price`; when no price is available the conversion fails with
/// `InsufficientData` instead of guessing.
pub fn net_filled_size(position: &Position, reference_price: Option<Decimal>) -> Result<Decimal> {
    let invested = total_invested(position)?;
    let mut base_size = Decimal::ZERO;

    for order in filled_orders(position) {
        let Some(size) = order.filled else {
            // A fill with no size recorded contributes nothing; the cost
            // basis still counts it via total_invested.
            warn!("Filled order {} has no size recorded", order.id);
            continue;
        };
        base_size += resolve_to_base(order, size, invested, reference_price)?;
    }

    Ok(match position.side() {
        TradeSide::Buy => base_size,
        TradeSide::Sell => -base_size,
    })
}

/// Average entry price over the filled size. Zero size yields zero rather
/// than a division error.
pub fn average_entry_price(invested: Decimal, filled_size: Decimal) -> Decimal {
    let magnitude = filled_size.abs();
    if magnitude.is_zero() || !is_size_significant(&magnitude) {
        return Decimal::ZERO;
    }
    invested / magnitude
}

fn filled_orders(position: &Position) -> impl Iterator<Item = &Order> {
    position
        .position_details
        .orders
        .iter()
        .filter(|o| o.is_filled())
}

/// Converts one order size into base units.
fn resolve_to_base(
    order: &Order,
    size: OrderSize,
    invested: Decimal,
    reference_price: Option<Decimal>,
) -> Result<Decimal> {
    match size {
        OrderSize::Base(amount) => Ok(amount),
        OrderSize::Quote(amount) => {
            let price = usable_price(order, reference_price, "quote")?;
            Ok(amount / price)
        }
        OrderSize::Percentage(fraction) => {
            // A percentage fill resolves against the position's invested
            // capital, expressed in quote currency.
            let price = usable_price(order, reference_price, "percentage")?;
            Ok(fraction * invested / price)
        }
    }
}

fn usable_price(
    order: &Order,
    reference_price: Option<Decimal>,
    unit: &'static str,
) -> Result<Decimal> {
    match reference_price {
        Some(price) if !price.is_zero() => Ok(price),
        _ => Err(LedgerError::InsufficientData {
            order_id: order.id.clone(),
            unit,
        }
        .into()),
    }
}
