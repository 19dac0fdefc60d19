//! Shared test builders for position records.

use rust_decimal::Decimal;

use super::*;
use crate::temporal::TemporalValue;

pub(crate) fn sample_asset(ticker: &str) -> Asset {
    Asset {
        name: ticker.to_string(),
        ticker: ticker.to_string(),
        pair: format!("{}/USDT", ticker),
        location: AssetLocation::Exchange,
        exchange: Some("binance".to_string()),
        wallet: "main".to_string(),
    }
}

pub(crate) fn sample_position(ticker: &str, side: TradeSide) -> Position {
    Position {
        id: format!("pos-{}", ticker),
        name: format!("{} swing", ticker),
        risk_level: 5,
        portfolio: "pf-1".to_string(),
        wallet_type: WalletType::Hot,
        seed_capital_tier: "tier-1".to_string(),
        strategy: "swing".to_string(),
        thesis: None,
        journal: None,
        asset: sample_asset(ticker),
        position_details: PositionDetails {
            status: PositionStatus::Active,
            side,
            fractal: "1D".to_string(),
            transaction_fee: None,
            date_opened: Some(TemporalValue::now()),
            date_closed: None,
            orders: Vec::new(),
            stop_loss: None,
            take_profit: None,
        },
    }
}

pub(crate) fn filled_order(id: &str, total_cost: Decimal, size: OrderSize) -> Order {
    Order {
        id: id.to_string(),
        date_open: TemporalValue::now(),
        average_price: None,
        total_cost: Some(total_cost),
        status: OrderStatus::Filled,
        order_type: OrderType::Market,
        fee: None,
        fee_unit: None,
        filled: Some(size),
        trigger: None,
        estimated_cost: None,
    }
}

pub(crate) fn submitted_order(id: &str, estimated_cost: Decimal) -> Order {
    Order {
        id: id.to_string(),
        date_open: TemporalValue::now(),
        average_price: None,
        total_cost: None,
        status: OrderStatus::Submitted,
        order_type: OrderType::Limit,
        fee: None,
        fee_unit: None,
        filled: None,
        trigger: None,
        estimated_cost: Some(estimated_cost),
    }
}

pub(crate) fn cancelled_order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        date_open: TemporalValue::now(),
        average_price: None,
        total_cost: Some(Decimal::new(999_999, 0)),
        status: OrderStatus::Cancelled,
        order_type: OrderType::Limit,
        fee: None,
        fee_unit: None,
        filled: Some(OrderSize::Base(Decimal::ONE)),
        trigger: None,
        estimated_cost: None,
    }
}

/// A buy position with one filled order: `size` base units for `total_cost`.
pub(crate) fn funded_position(
    ticker: &str,
    side: TradeSide,
    total_cost: Decimal,
    size: Decimal,
) -> Position {
    let mut position = sample_position(ticker, side);
    position
        .position_details
        .orders
        .push(filled_order("entry-1", total_cost, OrderSize::Base(size)));
    position
}
