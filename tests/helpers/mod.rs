//! Shared fixtures: an in-memory portal and HTML builders.

#![allow(dead_code)]

use async_trait::async_trait;
use roomfinder::filters::SearchFilters;
use roomfinder::portal::{Portal, PortalError};
use roomfinder::search::PAGE_SIZE;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

pub const BASE: &str = "https://portal.test/tumonline/";

pub fn base_url() -> Url {
    Url::parse(BASE).unwrap()
}

pub fn room_url(id: usize) -> Url {
    base_url()
        .join(&format!("wbRaum.editRaum?pRaumNr={id}"))
        .unwrap()
}

/// A search results page with one `td.C` cell per room id.
pub fn search_page(room_ids: impl IntoIterator<Item = usize>) -> String {
    let cells: String = room_ids
        .into_iter()
        .map(|id| format!(r#"<td class="C"><a href="wbRaum.editRaum?pRaumNr={id}">Raum {id}</a></td>"#))
        .collect();
    format!("<html><body><table><tr>{cells}</tr></table></body></html>")
}

pub fn empty_search_page() -> String {
    "<html><body><p>Keine Einträge gefunden</p></body></html>".to_string()
}

/// A room page with a name marker and `(start, end)` events in `ddmmYYYYHHMM`.
pub fn room_page(name: &str, events: &[(&str, &str)]) -> String {
    let containers: String = events
        .iter()
        .map(|(start, end)| {
            format!(
                r#"<div class="cocal-ev-container" data-event='{{"start":"{start}","end":"{end}","title":"Vorlesung"}}'></div>"#
            )
        })
        .collect();
    format!(r#"<html><body><span class="s">{name}</span>{containers}</body></html>"#)
}

/// In-memory portal. Search pages are keyed by (building id, usage id) and
/// served in order; anything past the configured pages is empty.
#[derive(Default)]
pub struct FakePortal {
    pages: HashMap<(u32, u32), Vec<String>>,
    rooms: HashMap<Url, String>,
    search_calls: AtomicUsize,
    room_calls: AtomicUsize,
    requested_starts: Mutex<Vec<usize>>,
    /// Never return an empty page.
    endless: bool,
    /// Added before serving any room page that exists.
    room_delay: Option<Duration>,
    /// Room pages whose fetch panics.
    panicking_rooms: Vec<Url>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endless() -> Self {
        Self {
            endless: true,
            ..Self::default()
        }
    }

    pub fn with_pages(mut self, building: u32, usage: u32, pages: Vec<String>) -> Self {
        self.pages.insert((building, usage), pages);
        self
    }

    pub fn with_room(mut self, id: usize, body: String) -> Self {
        self.rooms.insert(room_url(id), body);
        self
    }

    pub fn with_room_delay(mut self, delay: Duration) -> Self {
        self.room_delay = Some(delay);
        self
    }

    pub fn with_panicking_room(mut self, id: usize) -> Self {
        self.panicking_rooms.push(room_url(id));
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn room_calls(&self) -> usize {
        self.room_calls.load(Ordering::SeqCst)
    }

    pub fn requested_starts(&self) -> Vec<usize> {
        self.requested_starts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Portal for FakePortal {
    async fn search(
        &self,
        filters: &SearchFilters,
        page_start: usize,
    ) -> Result<String, PortalError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_starts.lock().unwrap().push(page_start);

        if self.endless {
            return Ok(search_page([page_start]));
        }

        let index = (page_start - 1) / PAGE_SIZE;
        Ok(self
            .pages
            .get(&(filters.building_category_id(), filters.usage_type_id()))
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_else(empty_search_page))
    }

    async fn fetch_room_page(&self, url: &Url) -> Result<String, PortalError> {
        self.room_calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking_rooms.contains(url) {
            panic!("room page {url} blew up");
        }
        let body = self.rooms.get(url).cloned().ok_or_else(|| PortalError::BadStatus {
            status: 404,
            url: url.to_string(),
        })?;
        if let Some(delay) = self.room_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(body)
    }

    fn base_url(&self) -> &Url {
        static BASE_URL: std::sync::LazyLock<Url> = std::sync::LazyLock::new(base_url);
        &BASE_URL
    }
}
