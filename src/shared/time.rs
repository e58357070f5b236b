use chrono::{DateTime, Local, Utc};
use std::time::Duration;

/// Source of the current time for the scheduler loop.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time elapsed from `since` to `now`. Clamps to zero if the clock went backwards.
pub fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - since).to_std().unwrap_or(Duration::ZERO)
}

/// Formats an instant in local time, e.g. `2024-03-01 14:05:09`.
pub fn format_local(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Formats a duration as fractional hours, e.g. `6.5h`.
pub fn format_hours(d: Duration) -> String {
    format!("{:.1}h", d.as_secs_f64() / 3600.0)
}
