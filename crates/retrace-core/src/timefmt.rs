use chrono::{Local, TimeZone};

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Describe how long ago a Unix timestamp was, e.g. "5 minutes ago".
///
/// Whole days win over everything else; below one day the unit steps
/// through seconds, minutes and hours with integer division. Instants in
/// the future clamp to zero elapsed time.
#[must_use]
pub fn relative_description(unix_secs: i64) -> String {
    describe_elapsed(Local::now().timestamp() - unix_secs)
}

fn describe_elapsed(elapsed_secs: i64) -> String {
    let secs = elapsed_secs.max(0);
    let days = secs / SECS_PER_DAY;
    if days > 0 {
        format!("{days} days ago")
    } else if secs < SECS_PER_MINUTE {
        format!("{secs} seconds ago")
    } else if secs < SECS_PER_HOUR {
        format!("{} minutes ago", secs / SECS_PER_MINUTE)
    } else {
        format!("{} hours ago", secs / SECS_PER_HOUR)
    }
}

/// Format a Unix timestamp as a local `YYYY-MM-DD HH:MM:SS` string.
///
/// Returns an empty string when the timestamp cannot be represented as a
/// local date-time; callers treat that the same way as the probe's
/// empty-string sentinel.
#[must_use]
pub fn absolute_description(unix_secs: i64) -> String {
    Local
        .timestamp_opt(unix_secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_below_one_minute() {
        assert_eq!(describe_elapsed(45), "45 seconds ago");
        assert_eq!(describe_elapsed(0), "0 seconds ago");
        assert_eq!(describe_elapsed(59), "59 seconds ago");
    }

    #[test]
    fn test_minutes_below_one_hour() {
        assert_eq!(describe_elapsed(60), "1 minutes ago");
        assert_eq!(describe_elapsed(5 * 60 + 30), "5 minutes ago");
        assert_eq!(describe_elapsed(3_599), "59 minutes ago");
    }

    #[test]
    fn test_hours_drop_the_remainder() {
        // 2h30m renders as plain "2 hours ago"
        assert_eq!(describe_elapsed(2 * 3_600 + 30 * 60), "2 hours ago");
        assert_eq!(describe_elapsed(3_600), "1 hours ago");
        assert_eq!(describe_elapsed(86_399), "23 hours ago");
    }

    #[test]
    fn test_whole_days_win() {
        assert_eq!(describe_elapsed(86_400), "1 days ago");
        // remainder hours are ignored once a full day has passed
        assert_eq!(describe_elapsed(3 * 86_400 + 2 * 3_600), "3 days ago");
    }

    #[test]
    fn test_future_instants_clamp_to_zero() {
        assert_eq!(describe_elapsed(-10), "0 seconds ago");
    }

    #[test]
    fn test_relative_description_uses_wall_clock() {
        let ts = Local::now().timestamp();
        // allow for the clock ticking between the capture and the call
        assert!(relative_description(ts).ends_with("seconds ago"));
    }

    #[test]
    fn test_absolute_round_trip() {
        let ts = Local
            .with_ymd_and_hms(2024, 1, 15, 13, 45, 30)
            .unwrap()
            .timestamp();
        assert_eq!(absolute_description(ts), "2024-01-15 13:45:30");
    }

    #[test]
    fn test_absolute_unrepresentable_is_empty() {
        assert_eq!(absolute_description(i64::MAX), "");
    }
}
