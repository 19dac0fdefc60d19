use chrono::{Datelike, Duration, NaiveDate};

use crate::history::Bucket;

/// First date of the bucket containing `date`. Weeks start on Monday,
/// months on the 1st.
pub fn bucket_start(date: NaiveDate, bucket: Bucket) -> NaiveDate {
    match bucket {
        Bucket::Day => date,
        Bucket::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
        Bucket::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .unwrap_or(date),
    }
}
