//! Temporal value type shared by every date-bearing field in the domain.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A point in time, or a marker meaning "before tracking began".
///
/// `Genesis` records predate the tracking history; their real timestamp is
/// unknown. A genesis value is neither "now" nor "missing": display and
/// sorting code must treat it as its own case. The variant order gives the
/// derived ordering we want, genesis sorts before every absolute timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TemporalValue {
    /// The record predates tracking; the exact date is unknown.
    Genesis,
    /// An absolute UTC timestamp.
    At(DateTime<Utc>),
}

impl TemporalValue {
    pub fn now() -> Self {
        TemporalValue::At(Utc::now())
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, TemporalValue::Genesis)
    }

    /// The absolute timestamp, if this value has one.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            TemporalValue::Genesis => None,
            TemporalValue::At(ts) => Some(*ts),
        }
    }

    /// Elapsed time between two absolute values. Genesis values are excluded
    /// from duration math, so any genesis endpoint yields `None`.
    pub fn elapsed_since(&self, earlier: &TemporalValue) -> Option<Duration> {
        match (self, earlier) {
            (TemporalValue::At(end), TemporalValue::At(start)) => Some(*end - *start),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for TemporalValue {
    fn from(ts: DateTime<Utc>) -> Self {
        TemporalValue::At(ts)
    }
}
