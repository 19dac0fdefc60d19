//! Unit tests for position domain models.

use chrono::Utc;
use rust_decimal_macros::dec;

use super::fixtures::{filled_order, sample_position};
use super::*;
use crate::errors::Error;
use crate::temporal::TemporalValue;

#[test]
fn risk_level_out_of_range_fails_validation() {
    let mut position = sample_position("BTC", TradeSide::Buy);
    position.risk_level = 11;
    assert!(matches!(position.validate(), Err(Error::Validation(_))));

    position.risk_level = 0;
    assert!(position.validate().is_err());

    position.risk_level = 10;
    assert!(position.validate().is_ok());
}

#[test]
fn closed_position_without_date_closed_fails_validation() {
    let mut position = sample_position("BTC", TradeSide::Buy);
    position.position_details.status = PositionStatus::Closed;
    assert!(position.validate().is_err());

    position.position_details.date_closed = Some(TemporalValue::Genesis);
    assert!(position.validate().is_ok());
}

#[test]
fn closing_is_terminal_and_freezes_orders() {
    let mut position = sample_position("ETH", TradeSide::Buy);
    position.close(Utc::now()).unwrap();
    assert!(position.is_closed());
    assert!(position.position_details.date_closed.is_some());

    // No transition back, no further order mutation.
    assert!(matches!(
        position.close(Utc::now()),
        Err(Error::Position(_))
    ));
    let order = filled_order("o1", dec!(100), OrderSize::Base(dec!(1)));
    assert!(matches!(position.add_order(order), Err(Error::Position(_))));
}

#[test]
fn percentage_size_rejects_values_outside_unit_interval() {
    assert!(OrderSize::percentage(dec!(0)).is_err());
    assert!(OrderSize::percentage(dec!(1.01)).is_err());
    assert_eq!(
        OrderSize::percentage(dec!(0.5)).unwrap(),
        OrderSize::Percentage(dec!(0.5))
    );
}

#[test]
fn order_size_serde_carries_payload_with_tag() {
    let json = serde_json::to_string(&OrderSize::Quote(dec!(250))).unwrap();
    assert!(json.contains("\"unit\":\"quote\""));
    let back: OrderSize = serde_json::from_str(&json).unwrap();
    assert_eq!(back, OrderSize::Quote(dec!(250)));
}
