//! Historical valuation domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mutability state of a valuation record.
///
/// Exactly one `Active` record exists per portfolio at any time: it
/// represents "now" and is the only mutable record. Each tick demotes the
/// previous `Active` record to `Historical`, which is then immutable
/// forever (never deleted, never re-activated).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationStatus {
    Active,
    Historical,
    Projected,
}

/// One time-stamped portfolio value snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalValuation {
    pub id: String,
    pub portfolio_id: String,
    pub value: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: ValuationStatus,
}

/// Time bucket for series aggregation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Day,
    Week,
    Month,
}

/// One aggregated point: the last value observed within the bucket.
/// Last-write-wins matches the point-in-time-balance semantics of a
/// valuation series; an average would not.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketPoint {
    pub period_start: NaiveDate,
    pub value: Decimal,
}

/// Inclusive time range filter for series queries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValuationRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ValuationRange {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| timestamp >= s) && self.end.map_or(true, |e| timestamp <= e)
    }
}
