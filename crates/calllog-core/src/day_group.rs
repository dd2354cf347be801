//! Calendar-relative day buckets for section headers.

use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// The day bucket a call falls into, relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayGroup {
    Today,
    Yesterday,
    /// Two or more calendar days ago.
    Other,
    /// "No previous entry" sentinel. Never assigned to a call.
    None,
}

impl DayGroup {
    /// Buckets a calendar-day difference. Negative differences are `Other`.
    pub const fn from_day_difference(days: i64) -> Self {
        match days {
            0 => Self::Today,
            1 => Self::Yesterday,
            _ => Self::Other,
        }
    }

    /// Section header text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Other => "Older",
            Self::None => "",
        }
    }
}

impl fmt::Display for DayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Computes the day group of a timestamp relative to `now`.
///
/// Uses calendar days in `now`'s time zone, not rolling 24-hour windows: a
/// call just before midnight is "yesterday" a minute later. Timestamps that
/// cannot be represented, or that lie in the future, are `Other`.
pub fn day_group_of<Tz: TimeZone>(timestamp_ms: i64, now: &DateTime<Tz>) -> DayGroup {
    let Some(then) = now.timezone().timestamp_millis_opt(timestamp_ms).single() else {
        return DayGroup::Other;
    };
    let days = now
        .date_naive()
        .signed_duration_since(then.date_naive())
        .num_days();
    DayGroup::from_day_difference(days)
}
