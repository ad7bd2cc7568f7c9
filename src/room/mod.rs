//! Per-room availability lookup.

pub mod calendar;
pub mod signal;

pub use calendar::{EventInterval, MalformedTimestamp, PORTAL_TZ};
pub use signal::AvailabilitySignal;

use crate::portal::{Portal, PortalError};
use crate::search::RoomLink;
use crate::utils::log_if_slow;
use chrono::DateTime;
use chrono_tz::Tz;
use html_scraper::{Html, Selector};
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

static ROOM_NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.s").unwrap());

/// A parenthesized group with no parentheses inside it.
static ROOM_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]+)\)").unwrap());

const SLOW_ROOM_FETCH: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error("room page {url} has no name marker")]
    MissingName { url: String },
    #[error("room page {url} has a bad calendar entry")]
    Calendar {
        url: String,
        #[source]
        source: MalformedTimestamp,
    },
}

/// One line of the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomReport {
    pub display_name: String,
    /// `None` only for the neutral "no reservations" placeholder.
    pub signal: Option<AvailabilitySignal>,
    pub nav_link: Option<Url>,
}

impl RoomReport {
    pub const NO_RESERVATIONS: &'static str = "No reservations found";

    pub fn new(display_name: String, signal: AvailabilitySignal, nav_base: Option<&Url>) -> Self {
        let nav_link = nav_base.and_then(|base| nav_link(base, &display_name));
        Self {
            display_name,
            signal: Some(signal),
            nav_link,
        }
    }

    /// Placeholder shown when the search produced no rooms at all.
    pub fn no_reservations() -> Self {
        Self {
            display_name: Self::NO_RESERVATIONS.to_string(),
            signal: None,
            nav_link: None,
        }
    }

    pub fn sort_key(&self) -> i64 {
        self.signal.map_or(0, AvailabilitySignal::sort_key)
    }
}

/// Room id token: the text inside the last parenthesized group of a name,
/// e.g. `5602.EG.001` for `"Hörsaal 1 (5602.EG.001)"`.
pub fn room_id_token(display_name: &str) -> Option<&str> {
    let caps = ROOM_ID_RE.captures_iter(display_name).last()?;
    let token = caps.get(1)?.as_str().trim();
    (!token.is_empty()).then_some(token)
}

/// Navigation link for a room, if its name carries a room id.
pub fn nav_link(nav_base: &Url, display_name: &str) -> Option<Url> {
    nav_base.join(room_id_token(display_name)?).ok()
}

/// Display name and calendar events parsed from one room page.
#[derive(Debug, Clone)]
pub struct RoomPage {
    pub display_name: String,
    pub events: calendar::CalendarEvents,
}

impl RoomPage {
    pub fn parse(body: &str, url: &Url) -> Result<Self, RoomError> {
        let html = Html::parse_document(body);

        let display_name = html
            .select(&ROOM_NAME)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| RoomError::MissingName {
                url: url.to_string(),
            })?;

        let events = calendar::extract_events(&html).map_err(|source| RoomError::Calendar {
            url: url.to_string(),
            source,
        })?;

        Ok(Self {
            display_name,
            events,
        })
    }
}

/// Fetches room pages and turns them into [`RoomReport`]s.
pub struct RoomAvailabilityResolver<P: Portal + ?Sized> {
    portal: std::sync::Arc<P>,
    nav_base: Option<Url>,
}

impl<P: Portal + ?Sized> Clone for RoomAvailabilityResolver<P> {
    fn clone(&self) -> Self {
        Self {
            portal: self.portal.clone(),
            nav_base: self.nav_base.clone(),
        }
    }
}

impl<P: Portal + ?Sized> RoomAvailabilityResolver<P> {
    pub fn new(portal: std::sync::Arc<P>, nav_base: Option<Url>) -> Self {
        Self { portal, nav_base }
    }

    /// Look up one room's name and availability as of `now`.
    pub async fn resolve(&self, link: &RoomLink, now: DateTime<Tz>) -> Result<RoomReport, RoomError> {
        let start = Instant::now();
        let body = self.portal.fetch_room_page(link).await?;
        log_if_slow(start, SLOW_ROOM_FETCH, link.as_str());

        let page = RoomPage::parse(&body, link)?;
        let signal = AvailabilitySignal::compute(&page.events.intervals, now);

        debug!(
            room = page.display_name.as_str(),
            events = page.events.intervals.len(),
            skipped = page.events.skipped,
            signal = %signal,
            "resolved room"
        );

        Ok(RoomReport::new(page.display_name, signal, self.nav_base.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://campus.tum.de/tumonline/wbRaum.editRaum?pRaumNr=1").unwrap()
    }

    #[test]
    fn test_room_id_token_uses_last_group() {
        assert_eq!(
            room_id_token("Hörsaal 1 (Interims I) (5602.EG.001)"),
            Some("5602.EG.001")
        );
        assert_eq!(room_id_token("Seminarraum (0001.01.001)"), Some("0001.01.001"));
        assert_eq!(
            room_id_token("Hörsaal (Interim (5602.EG.001))"),
            Some("5602.EG.001")
        );
        assert_eq!(
            room_id_token("Raum (5602.EG.001) Nebenraum)"),
            Some("5602.EG.001")
        );
    }

    #[test]
    fn test_room_id_token_absent() {
        assert_eq!(room_id_token("Hörsaal ohne Nummer"), None);
        assert_eq!(room_id_token("Leer ()"), None);
        assert_eq!(room_id_token("Nur zu )("), None);
        assert_eq!(room_id_token("Raum ( )"), None);
    }

    #[test]
    fn test_nav_link() {
        let base = Url::parse("https://nav.tum.de/room/").unwrap();
        assert_eq!(
            nav_link(&base, "MW 1801 (5508.01.801)").map(|u| u.to_string()),
            Some("https://nav.tum.de/room/5508.01.801".to_string())
        );
        assert_eq!(nav_link(&base, "MW 1801"), None);
    }

    #[test]
    fn test_room_page_parse() {
        let body = r#"<html><body>
            <span class="s"> Hörsaal 1 (5602.EG.001) </span>
            <span class="s">second marker ignored</span>
            <div class="cocal-ev-container" data-event='{"start":"021220241400","end":"021220241530"}'></div>
        </body></html>"#;
        let page = RoomPage::parse(body, &url()).unwrap();
        assert_eq!(page.display_name, "Hörsaal 1 (5602.EG.001)");
        assert_eq!(page.events.intervals.len(), 1);
    }

    #[test]
    fn test_room_page_without_name_fails() {
        let body = r#"<html><body><span class="t">Hörsaal</span></body></html>"#;
        assert!(matches!(
            RoomPage::parse(body, &url()),
            Err(RoomError::MissingName { .. })
        ));
    }

    #[test]
    fn test_room_page_bad_timestamp_fails() {
        let body = r#"<html><body><span class="s">Raum (1)</span>
            <div class="cocal-ev-container" data-event='{"start":"soon","end":"021220241530"}'></div>
        </body></html>"#;
        assert!(matches!(
            RoomPage::parse(body, &url()),
            Err(RoomError::Calendar { .. })
        ));
    }

    #[test]
    fn test_no_reservations_report_is_neutral() {
        let report = RoomReport::no_reservations();
        assert_eq!(report.signal, None);
        assert_eq!(report.sort_key(), 0);
        assert_eq!(report.nav_link, None);
    }
}
