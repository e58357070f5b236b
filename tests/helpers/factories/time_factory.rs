use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;

/// Fixed origin for test timelines.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single().unwrap()
}

/// `base_time()` plus `h` hours, rounded to the millisecond.
pub fn at_hours(h: f64) -> DateTime<Utc> {
    base_time() + chrono::Duration::milliseconds((h * 3_600_000.0).round() as i64)
}

pub fn hours(h: f64) -> Duration {
    Duration::from_millis((h * 3_600_000.0).round() as u64)
}
