//! Relative timestamps for notification rows

use chrono::{DateTime, Utc};

/// How a panel words the age of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStyle {
    /// "5 minutes ago", falling back to "Mar 12, 2024" after a week
    Long,
    /// "5m ago", falling back to "3/12/2024" after a week
    Compact,
    /// "5m", falling back to "3/12/2024" after a day
    Short,
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {} ago", n, unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

impl TimeStyle {
    /// Label for something created at `created_at`, seen at `now`
    ///
    /// Timestamps in the future count as just now; missing ones render empty.
    pub fn format(&self, created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
        let Some(created_at) = created_at else {
            return String::new();
        };
        let secs = (now - created_at).num_seconds();

        match self {
            TimeStyle::Long => match secs {
                s if s < MINUTE => "Just now".to_string(),
                s if s < HOUR => plural(s / MINUTE, "minute"),
                s if s < DAY => plural(s / HOUR, "hour"),
                s if s < WEEK => plural(s / DAY, "day"),
                _ => created_at.format("%b %-d, %Y").to_string(),
            },
            TimeStyle::Compact => match secs {
                s if s < 10 => "just now".to_string(),
                s if s < MINUTE => format!("{}s ago", s),
                s if s < HOUR => format!("{}m ago", s / MINUTE),
                s if s < DAY => format!("{}h ago", s / HOUR),
                s if s < WEEK => format!("{}d ago", s / DAY),
                _ => created_at.format("%-m/%-d/%Y").to_string(),
            },
            TimeStyle::Short => match secs {
                s if s < MINUTE => "just now".to_string(),
                s if s < HOUR => format!("{}m", s / MINUTE),
                s if s < DAY => format!("{}h", s / HOUR),
                _ => created_at.format("%-m/%-d/%Y").to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    fn ago(secs: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::seconds(secs))
    }

    #[test]
    fn test_long_style() {
        let style = TimeStyle::Long;
        assert_eq!(style.format(ago(30), now()), "Just now");
        assert_eq!(style.format(ago(60), now()), "1 minute ago");
        assert_eq!(style.format(ago(5 * 60), now()), "5 minutes ago");
        assert_eq!(style.format(ago(3600), now()), "1 hour ago");
        assert_eq!(style.format(ago(3 * 86400), now()), "3 days ago");
        assert_eq!(style.format(ago(8 * 86400), now()), "Mar 12, 2024");
        assert_eq!(style.format(ago(-120), now()), "Just now");
        assert_eq!(style.format(None, now()), "");
    }

    #[test]
    fn test_compact_style() {
        let style = TimeStyle::Compact;
        assert_eq!(style.format(ago(4), now()), "just now");
        assert_eq!(style.format(ago(42), now()), "42s ago");
        assert_eq!(style.format(ago(7200), now()), "2h ago");
        assert_eq!(style.format(ago(2 * 86400), now()), "2d ago");
        assert_eq!(style.format(ago(30 * 86400), now()), "2/19/2024");
    }

    #[test]
    fn test_short_style() {
        let style = TimeStyle::Short;
        assert_eq!(style.format(ago(59), now()), "just now");
        assert_eq!(style.format(ago(600), now()), "10m");
        assert_eq!(style.format(ago(5 * 3600), now()), "5h");
        assert_eq!(style.format(ago(86400), now()), "3/19/2024");
    }
}
