// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.
//!
//! Row timestamps are stored as RFC3339 text; token expiries are stored as
//! integer microseconds since the Unix epoch so that comparisons happen in
//! SQL at full precision.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Microseconds since the Unix epoch, as stored in the `tokens` table.
pub fn to_micros(date: DateTime<Utc>) -> i64 {
    date.timestamp_micros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_uses_z_suffix() {
        let date = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-03-01T12:30:00Z");
    }

    #[test]
    fn test_micros_keep_sub_second_precision() {
        let date = Utc.timestamp_opt(1_700_000_000, 1_000).unwrap();
        assert_eq!(to_micros(date), 1_700_000_000_000_001);
    }
}
