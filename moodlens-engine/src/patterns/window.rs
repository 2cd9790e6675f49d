// Summary Window - Fixed look-back lengths and their time bounds
//
// current = [now - d, now]
// prior   = [now - 2d, now - d)

use chrono::{DateTime, Duration, Utc};
use moodlens_common::time;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Look-back window for pattern summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SummaryWindow {
    #[default]
    Week,
    Fortnight,
    Month,
}

impl SummaryWindow {
    pub const ALL: [SummaryWindow; 3] = [
        SummaryWindow::Week,
        SummaryWindow::Fortnight,
        SummaryWindow::Month,
    ];

    pub fn days(&self) -> u32 {
        match self {
            SummaryWindow::Week => 7,
            SummaryWindow::Fortnight => 14,
            SummaryWindow::Month => 30,
        }
    }

    pub fn duration(&self) -> Duration {
        time::days(self.days())
    }

    /// Current and prior window bounds ending at `now`
    pub fn bounds(&self, now: DateTime<Utc>) -> WindowBounds {
        let length = self.duration();
        WindowBounds {
            prior_start: now - length - length,
            current_start: now - length,
            end: now,
        }
    }
}

impl fmt::Display for SummaryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days())
    }
}

impl FromStr for SummaryWindow {
    type Err = moodlens_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let days = normalized
            .strip_suffix("days")
            .or_else(|| normalized.strip_suffix('d'))
            .unwrap_or(&normalized)
            .trim();

        match days {
            "7" | "week" | "weekly" => Ok(SummaryWindow::Week),
            "14" | "fortnight" | "2w" => Ok(SummaryWindow::Fortnight),
            "30" | "month" | "monthly" => Ok(SummaryWindow::Month),
            _ => Err(moodlens_common::Error::InvalidInput(format!(
                "Unsupported summary window: {:?} (expected 7d, 14d or 30d)",
                s
            ))),
        }
    }
}

impl Serialize for SummaryWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SummaryWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Time bounds of a current window and the equally long window before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub prior_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WindowBounds {
    /// `current_start <= timestamp <= end`
    pub fn in_current(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.current_start && timestamp <= self.end
    }

    /// `prior_start <= timestamp < current_start`
    pub fn in_prior(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.prior_start && timestamp < self.current_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_variants() {
        assert_eq!("7".parse::<SummaryWindow>().unwrap(), SummaryWindow::Week);
        assert_eq!("7d".parse::<SummaryWindow>().unwrap(), SummaryWindow::Week);
        assert_eq!(" Week ".parse::<SummaryWindow>().unwrap(), SummaryWindow::Week);
        assert_eq!("14D".parse::<SummaryWindow>().unwrap(), SummaryWindow::Fortnight);
        assert_eq!("30days".parse::<SummaryWindow>().unwrap(), SummaryWindow::Month);
        assert!("10d".parse::<SummaryWindow>().is_err());
        assert!("".parse::<SummaryWindow>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for window in SummaryWindow::ALL {
            assert_eq!(window.to_string().parse::<SummaryWindow>().unwrap(), window);
        }
        assert_eq!(SummaryWindow::Month.to_string(), "30d");
    }

    #[test]
    fn test_bounds_split() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        let bounds = SummaryWindow::Week.bounds(now);

        assert_eq!(bounds.current_start, now - Duration::days(7));
        assert_eq!(bounds.prior_start, now - Duration::days(14));

        // Boundary instant belongs to the current window only
        assert!(bounds.in_current(bounds.current_start));
        assert!(!bounds.in_prior(bounds.current_start));

        assert!(bounds.in_current(now));
        assert!(!bounds.in_current(now + Duration::seconds(1)));
        assert!(bounds.in_prior(bounds.prior_start));
        assert!(!bounds.in_prior(bounds.prior_start - Duration::seconds(1)));
    }
}
