//! Availability of a room relative to "now".

use super::calendar::EventInterval;
use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;

/// Lookahead of the portal's calendar view: one week, in minutes.
pub const HORIZON_MINUTES: i64 = 7 * 24 * 60;

/// Sort key of an occupied room; below every real minute count.
pub const OCCUPIED_KEY: i64 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilitySignal {
    /// An event covers the current instant.
    Occupied,
    /// Free until the next event, which starts in this many whole minutes.
    FreeForMinutes(u32),
    /// No upcoming event inside the visible calendar window.
    FreeForHorizon,
}

impl AvailabilitySignal {
    /// Integer used for ranking, larger means more free time.
    pub fn sort_key(self) -> i64 {
        match self {
            Self::Occupied => OCCUPIED_KEY,
            Self::FreeForMinutes(minutes) => i64::from(minutes),
            Self::FreeForHorizon => HORIZON_MINUTES,
        }
    }

    pub fn is_free(self) -> bool {
        !matches!(self, Self::Occupied)
    }

    /// Work out the signal for a set of intervals.
    ///
    /// Any interval containing `now` wins immediately. Otherwise the earliest
    /// interval starting after `now` decides, rounded down to whole minutes.
    pub fn compute(intervals: &[EventInterval], now: DateTime<Tz>) -> Self {
        let mut next_start: Option<DateTime<Tz>> = None;

        for interval in intervals {
            if interval.contains(now) {
                return Self::Occupied;
            }
            if interval.start > now && next_start.is_none_or(|next| interval.start < next) {
                next_start = Some(interval.start);
            }
        }

        match next_start {
            Some(start) => {
                let minutes = (start - now).num_minutes();
                Self::FreeForMinutes(u32::try_from(minutes).unwrap_or(u32::MAX))
            }
            None => Self::FreeForHorizon,
        }
    }
}

impl fmt::Display for AvailabilitySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occupied => f.write_str("Occupied"),
            Self::FreeForHorizon => f.write_str("Free for the entire week"),
            // the next event sits exactly on the horizon
            Self::FreeForMinutes(minutes) if i64::from(*minutes) == HORIZON_MINUTES => {
                f.write_str("Free for the entire week")
            }
            Self::FreeForMinutes(minutes) => {
                write!(f, "Free for {} hours {} minutes", minutes / 60, minutes % 60)
            }
        }
    }
}
