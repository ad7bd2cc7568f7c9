//! Extraction of scheduled events from a room page's calendar markup.
//!
//! Each calendar entry is a `div.cocal-ev-container` whose `data-event`
//! attribute holds a JSON-ish blob containing `"start":"ddmmYYYYHHMM"` and
//! `"end":"ddmmYYYYHHMM"`. The blob is not reliably valid JSON, so the two
//! values are cut out by substring instead of being deserialized.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use html_scraper::{Html, Selector};
use std::sync::LazyLock;

/// Time zone the portal writes its wall-clock timestamps in.
pub const PORTAL_TZ: Tz = chrono_tz::Europe::Berlin;

const TIMESTAMP_FORMAT: &str = "%d%m%Y%H%M";
const START_MARKER: &str = r#""start":""#;
const END_MARKER: &str = r#""end":""#;

static EVENT_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.cocal-ev-container").unwrap());

/// One scheduled booking of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl EventInterval {
    /// Whether `now` falls inside the interval, both ends inclusive.
    pub fn contains(&self, now: DateTime<Tz>) -> bool {
        self.start <= now && now <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventParse {
    Parsed(EventInterval),
    /// Attribute missing or without both a start and an end marker.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed calendar timestamp {raw:?}")]
pub struct MalformedTimestamp {
    pub raw: String,
}

/// Calendar events found on one page, plus how many containers were skipped.
#[derive(Debug, Clone, Default)]
pub struct CalendarEvents {
    pub intervals: Vec<EventInterval>,
    pub skipped: usize,
}

/// Parse a `ddmmYYYYHHMM` portal timestamp into an absolute instant.
///
/// Times inside a daylight-saving gap do not exist and are rejected; times
/// repeated when clocks go back resolve to the earlier instant.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Tz>, MalformedTimestamp> {
    let malformed = || MalformedTimestamp {
        raw: raw.to_owned(),
    };
    // chrono accepts a shorter year, the portal always writes exactly 12 digits
    if raw.len() != 12 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| malformed())?;
    PORTAL_TZ
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(malformed)
}

/// The quoted value following `marker`, if the marker is present.
fn value_after<'a>(data: &'a str, marker: &str) -> Option<&'a str> {
    let rest = &data[data.find(marker)? + marker.len()..];
    Some(rest.split('"').next().unwrap_or(rest))
}

/// Parse the contents of one `data-event` attribute.
pub fn parse_event_data(data: &str) -> Result<EventParse, MalformedTimestamp> {
    let (Some(start), Some(end)) = (
        value_after(data, START_MARKER),
        value_after(data, END_MARKER),
    ) else {
        return Ok(EventParse::Skipped);
    };

    Ok(EventParse::Parsed(EventInterval {
        start: parse_timestamp(start)?,
        end: parse_timestamp(end)?,
    }))
}

/// Collect every event interval on a room page.
pub fn extract_events(html: &Html) -> Result<CalendarEvents, MalformedTimestamp> {
    let mut events = CalendarEvents::default();

    for container in html.select(&EVENT_CONTAINER) {
        let parsed = match container.attr("data-event") {
            Some(data) => parse_event_data(data)?,
            None => EventParse::Skipped,
        };
        match parsed {
            EventParse::Parsed(interval) => events.intervals.push(interval),
            EventParse::Skipped => events.skipped += 1,
        }
    }

    Ok(events)
}
