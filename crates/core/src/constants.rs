/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 8;

/// Decimal precision for percentage figures
pub const PERCENT_PRECISION: u32 = 4;

/// Default number of tickers returned by top-holdings queries
pub const DEFAULT_TOP_HOLDINGS: usize = 3;

/// How far back the day-change computation looks for the comparison record
pub const DAY_CHANGE_LOOKBACK_HOURS: i64 = 24;

/// A comparison record older than this makes the day change approximate
pub const DAY_CHANGE_STALE_HOURS: i64 = 48;

/// Quantity threshold below which a filled size is treated as dust
pub const QUANTITY_THRESHOLD: &str = "0.00000001";
