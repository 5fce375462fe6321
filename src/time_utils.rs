// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Compact relative age: minutes under an hour, hours under a day, else days.
///
/// Timestamps in the future count as zero minutes old.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes().max(0);
    if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / (24 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_utc_rfc3339_uses_z_suffix() {
        let date = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-01-02T03:04:05Z");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59m");
        assert_eq!(time_ago(now - Duration::minutes(60), now), "1h");
        assert_eq!(time_ago(now - Duration::hours(23), now), "23h");
        assert_eq!(time_ago(now - Duration::hours(24), now), "1d");
        assert_eq!(time_ago(now - Duration::days(9), now), "9d");

        assert_eq!(time_ago(now - Duration::minutes(90), now), "1h");
        assert_eq!(time_ago(now - Duration::minutes(30), now), "30m");
        assert_eq!(time_ago(now - Duration::days(3), now), "3d");
    }

    #[test]
    fn test_time_ago_clamps_future_timestamps() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::hours(3), now), "0m");
    }
}
