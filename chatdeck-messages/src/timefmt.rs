//! Display Timestamps
//!
//! Maps absolute message timestamps (UNIX epoch milliseconds) to the short
//! labels an inbox shows next to each conversation. Three styles exist side
//! by side because different screens want different density:
//!
//! - [`format_relative`]: calendar-bucketed (`"Just now"`, `"03:45 PM"`,
//!   `"Yesterday"`, `"Mon"`, `"01 Dec"`). The inbox default.
//! - [`format_elapsed`]: coarse elapsed buckets (`"12 min ago"`,
//!   `"3 hrs ago"`, `"4 days ago"`).
//! - [`format_exact`]: the full stamp a message bubble shows
//!   (`"01 Dec 2024, 03:45 PM"`).
//!
//! All three take the wall-clock "now" as an argument instead of reading a
//! live clock, so output is a pure function of its inputs plus the timezone.
//! The two-argument forms use the local zone; the `*_in` variants take an
//! explicit zone and exist mainly so tests can pin a fixed offset.
//!
//! Every `i64` input produces a defined string. Out-of-range instants clamp
//! to a representable date rather than failing; a timestamp ahead of `now`
//! reads as `"Just now"`, same as the freshest past message.

use std::fmt;

use chrono::{DateTime, Datelike, Local, LocalResult, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_IN_MINUTE: i64 = 60 * 1000;
const MILLIS_IN_DAY: i64 = 24 * 60 * MILLIS_IN_MINUTE;

// Keeps clamped instants inside chrono's representable year range for any
// fixed offset applied on top.
const CLAMP_MS: i64 = 8_000_000_000_000_000;

/// Which timestamp style a screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    /// Calendar buckets: "Just now" / time of day / "Yesterday" / weekday / date
    #[default]
    Calendar,
    /// Elapsed buckets: "12 min ago" / "3 hrs ago" / "4 days ago"
    Elapsed,
    /// Full stamp: "01 Dec 2024, 03:45 PM"
    Exact,
}

impl TimeStyle {
    /// Format `timestamp` in this style against the injected `now`
    pub fn format(&self, timestamp: i64, now: i64) -> String {
        self.format_in(timestamp, now, &Local)
    }

    /// Format in this style with an explicit timezone
    pub fn format_in<Tz>(&self, timestamp: i64, now: i64, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            Self::Calendar => format_relative_in(timestamp, now, tz),
            Self::Elapsed => format_elapsed_in(timestamp, now, tz),
            Self::Exact => format_exact_in(timestamp, tz),
        }
    }
}

/// Calendar-bucketed relative label for an inbox row
///
/// - `0` is the "no timestamp known" sentinel and yields `""`
/// - under a minute old → `"Just now"`
/// - same calendar day as `now` → `"hh:mm AM/PM"`
/// - the prior calendar day → `"Yesterday"`, even when under 24h elapsed
/// - under 7×24h elapsed → abbreviated weekday (`"Mon"`)
/// - otherwise → `"dd MMM"`, no year
///
/// Today/yesterday compare calendar fields while the weekday bucket compares
/// elapsed time; the mix is intentional and matches what users see on the
/// phone side.
pub fn format_relative(timestamp: i64, now: i64) -> String {
    format_relative_in(timestamp, now, &Local)
}

/// [`format_relative`] with an explicit timezone
pub fn format_relative_in<Tz>(timestamp: i64, now: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if timestamp == 0 {
        return String::new();
    }

    let diff = now.saturating_sub(timestamp);
    if diff < MILLIS_IN_MINUTE {
        return "Just now".to_string();
    }

    let msg = datetime_in(timestamp, tz);
    let now_dt = datetime_in(now, tz);

    let same_year = msg.year() == now_dt.year();
    let same_day_of_year = msg.ordinal() == now_dt.ordinal();

    // Today -> time of day
    if same_year && same_day_of_year {
        return msg.format("%I:%M %p").to_string();
    }

    // Yesterday by calendar date, regardless of elapsed hours
    let is_yesterday = now_dt
        .date_naive()
        .pred_opt()
        .is_some_and(|yesterday| msg.date_naive() == yesterday);
    if is_yesterday {
        return "Yesterday".to_string();
    }

    // Within the last 7 days of elapsed time
    if diff < 7 * MILLIS_IN_DAY {
        return msg.format("%a").to_string();
    }

    msg.format("%d %b").to_string()
}

/// Coarse elapsed-bucket label
///
/// `"Just now"`, `"N min ago"`, `"N hrs ago"`, `"N days ago"`, then the
/// `"dd MMM"` date for anything a week or older. `0` yields `""`.
pub fn format_elapsed(timestamp: i64, now: i64) -> String {
    format_elapsed_in(timestamp, now, &Local)
}

/// [`format_elapsed`] with an explicit timezone
pub fn format_elapsed_in<Tz>(timestamp: i64, now: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if timestamp == 0 {
        return String::new();
    }

    let diff = now.saturating_sub(timestamp);
    let minutes = diff / MILLIS_IN_MINUTE;
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{} hrs ago", hours)
    } else if days < 7 {
        format!("{} days ago", days)
    } else {
        datetime_in(timestamp, tz).format("%d %b").to_string()
    }
}

/// Full stamp for a message bubble: `"01 Dec 2024, 03:45 PM"`
pub fn format_exact(timestamp: i64) -> String {
    format_exact_in(timestamp, &Local)
}

/// [`format_exact`] with an explicit timezone
pub fn format_exact_in<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    datetime_in(timestamp, tz).format("%d %b %Y, %I:%M %p").to_string()
}

/// Convert epoch milliseconds to a zoned datetime without failing
fn datetime_in<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> DateTime<Tz> {
    let clamped = timestamp.clamp(-CLAMP_MS, CLAMP_MS);
    match tz.timestamp_millis_opt(clamped) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        // Unreachable after clamping; fall back to the epoch instant
        LocalResult::None => DateTime::<Utc>::UNIX_EPOCH.with_timezone(tz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_zero_is_empty_sentinel() {
        assert_eq!(format_relative_in(0, 1_700_000_000_000, &utc()), "");
        assert_eq!(format_elapsed_in(0, 1_700_000_000_000, &utc()), "");
    }

    #[test]
    fn test_just_now_under_a_minute() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        assert_eq!(format_relative_in(now - 30_000, now, &utc()), "Just now");
        assert_eq!(format_relative_in(now - 59_999, now, &utc()), "Just now");
    }

    #[test]
    fn test_future_timestamp_reads_just_now() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        assert_eq!(format_relative_in(now + 3_600_000, now, &utc()), "Just now");
    }

    #[test]
    fn test_same_day_shows_time_of_day() {
        let now = millis(2024, 12, 10, 18, 0, 0);
        let ts = millis(2024, 12, 10, 15, 45, 0);
        assert_eq!(format_relative_in(ts, now, &utc()), "03:45 PM");
    }

    #[test]
    fn test_same_day_morning() {
        let now = millis(2024, 12, 10, 18, 0, 0);
        let ts = millis(2024, 12, 10, 9, 5, 0);
        assert_eq!(format_relative_in(ts, now, &utc()), "09:05 AM");
    }

    #[test]
    fn test_yesterday_even_under_24h_elapsed() {
        // 23:59 yesterday vs 00:01 today: 2 minutes elapsed, still "Yesterday"
        let now = millis(2024, 12, 10, 0, 1, 0);
        let ts = millis(2024, 12, 9, 23, 59, 0);
        assert_eq!(format_relative_in(ts, now, &utc()), "Yesterday");
    }

    #[test]
    fn test_within_week_shows_weekday() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        // 2024-12-07 was a Saturday
        let ts = millis(2024, 12, 7, 12, 0, 0);
        assert_eq!(format_relative_in(ts, now, &utc()), "Sat");
    }

    #[test]
    fn test_weekday_bucket_uses_elapsed_time() {
        // 6 days 23 hours elapsed but 7 calendar days back: the elapsed
        // comparison wins and the label is still a weekday
        let now = millis(2024, 12, 10, 1, 0, 0);
        let ts = millis(2024, 12, 3, 2, 0, 0);
        assert_eq!(format_relative_in(ts, now, &utc()), "Tue");
    }

    #[test]
    fn test_older_shows_day_month_without_year() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        let ts = millis(2024, 11, 30, 12, 0, 0);
        assert_eq!(format_relative_in(ts, now, &utc()), "30 Nov");
    }

    #[test]
    fn test_ten_days_old_matches_dd_mmm_shape() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        let ts = now - 10 * MILLIS_IN_DAY;
        let label = format_relative_in(ts, now, &utc());

        let mut parts = label.split(' ');
        let day = parts.next().unwrap();
        let month = parts.next().unwrap();
        assert!(parts.next().is_none(), "no year component in {:?}", label);
        assert_eq!(day.len(), 2);
        assert!(day.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(month.len(), 3);
    }

    #[test]
    fn test_negative_timestamp_is_total() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        let label = format_relative_in(-1, now, &utc());
        assert_eq!(label, "31 Dec");
    }

    #[test]
    fn test_extreme_timestamps_do_not_panic() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        assert!(!format_relative_in(i64::MIN, now, &utc()).is_empty());
        assert!(!format_relative_in(i64::MAX, now, &utc()).is_empty());
        assert!(!format_exact_in(i64::MIN, &utc()).is_empty());
    }

    #[test]
    fn test_elapsed_buckets() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        assert_eq!(format_elapsed_in(now - 30_000, now, &utc()), "Just now");
        assert_eq!(
            format_elapsed_in(now - 12 * MILLIS_IN_MINUTE, now, &utc()),
            "12 min ago"
        );
        assert_eq!(
            format_elapsed_in(now - 3 * 60 * MILLIS_IN_MINUTE, now, &utc()),
            "3 hrs ago"
        );
        assert_eq!(
            format_elapsed_in(now - 4 * MILLIS_IN_DAY, now, &utc()),
            "4 days ago"
        );
        assert_eq!(
            format_elapsed_in(millis(2024, 11, 30, 12, 0, 0), now, &utc()),
            "30 Nov"
        );
    }

    #[test]
    fn test_exact_stamp() {
        let ts = millis(2024, 12, 1, 15, 45, 0);
        assert_eq!(format_exact_in(ts, &utc()), "01 Dec 2024, 03:45 PM");
    }

    #[test]
    fn test_style_dispatch() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        let ts = now - 30_000;

        assert_eq!(TimeStyle::Calendar.format_in(ts, now, &utc()), "Just now");
        assert_eq!(TimeStyle::Elapsed.format_in(ts, now, &utc()), "Just now");
        assert!(TimeStyle::Exact.format_in(ts, now, &utc()).contains("2024"));
    }

    #[test]
    fn test_determinism() {
        let now = millis(2024, 12, 10, 12, 0, 0);
        let ts = millis(2024, 12, 9, 8, 30, 0);
        assert_eq!(
            format_relative_in(ts, now, &utc()),
            format_relative_in(ts, now, &utc())
        );
    }
}
