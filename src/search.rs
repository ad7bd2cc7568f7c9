//! Paginated discovery of room detail links from the portal's room search.

use crate::filters::SearchFilters;
use crate::portal::{Portal, PortalError};
use html_scraper::{ElementRef, Html, Selector};
use indexmap::IndexSet;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Rows per result page; fixed by the portal.
pub const PAGE_SIZE: usize = 30;

/// An absolute URL of one room's detail/calendar page.
pub type RoomLink = Url;

static RESULT_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.C").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error("search result on page starting at {page_start} has unusable link {href:?}")]
    MalformedHref {
        page_start: usize,
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// What became of a single result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Parsed(RoomLink),
    /// The row had no anchor, or the anchor had no `href`.
    Skipped,
}

/// Parsed and skipped row counts for one result page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub parsed: usize,
    pub skipped: usize,
}

impl PageSummary {
    pub fn rows(&self) -> usize {
        self.parsed + self.skipped
    }
}

/// Everything collected while paging through one or more searches.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Room links in portal order. Only [`SearchPaginator::fetch_all`]
    /// removes duplicates.
    pub links: Vec<RoomLink>,
    /// Search requests issued, including each terminating empty page.
    pub pages: usize,
    /// Rows skipped because they carried no usable anchor.
    pub skipped: usize,
    /// Set when a search hit `max_pages` before running out of rows.
    pub truncated: bool,
}

/// Extract the outcome of every result row on a search page.
pub fn parse_result_rows(
    html: &Html,
    base: &Url,
    page_start: usize,
) -> Result<Vec<RowOutcome>, SearchError> {
    html.select(&RESULT_CELL)
        .map(|cell| parse_result_row(cell, base, page_start))
        .collect()
}

fn parse_result_row(
    cell: ElementRef<'_>,
    base: &Url,
    page_start: usize,
) -> Result<RowOutcome, SearchError> {
    let Some(href) = cell.select(&ANCHOR).next().and_then(|a| a.attr("href")) else {
        return Ok(RowOutcome::Skipped);
    };
    if href.is_empty() {
        return Ok(RowOutcome::Skipped);
    }

    base.join(href)
        .map(RowOutcome::Parsed)
        .map_err(|source| SearchError::MalformedHref {
            page_start,
            href: href.to_owned(),
            source,
        })
}

/// Pages through the portal's room search until a page comes back empty.
pub struct SearchPaginator<'a, P: Portal + ?Sized> {
    portal: &'a P,
    max_pages: usize,
}

impl<'a, P: Portal + ?Sized> SearchPaginator<'a, P> {
    pub fn new(portal: &'a P, max_pages: usize) -> Self {
        Self { portal, max_pages }
    }

    /// Fetch every room link matching `filters`, in portal order.
    ///
    /// Rows are returned as the portal served them; a room listed twice
    /// appears twice.
    pub async fn fetch_room_links(&self, filters: &SearchFilters) -> Result<SearchOutcome, SearchError> {
        let mut outcome = SearchOutcome::default();
        let links = self.collect_into(filters, &mut outcome).await?;
        outcome.links = links;
        Ok(outcome)
    }

    /// Run each filter set in turn on the same session and merge the links,
    /// keeping the first occurrence of every room.
    pub async fn fetch_all(&self, filters: &[SearchFilters]) -> Result<SearchOutcome, SearchError> {
        let start = Instant::now();
        let mut links = IndexSet::new();
        let mut outcome = SearchOutcome::default();
        let mut found = 0;

        for f in filters {
            let batch = self.collect_into(f, &mut outcome).await?;
            found += batch.len();
            links.extend(batch);
        }

        outcome.links = links.into_iter().collect();
        info!(
            searches = filters.len(),
            pages = outcome.pages,
            rooms = outcome.links.len(),
            duplicates = found - outcome.links.len(),
            skipped = outcome.skipped,
            duration = crate::utils::fmt_duration(start.elapsed()),
            "room search finished"
        );
        Ok(outcome)
    }

    async fn collect_into(
        &self,
        filters: &SearchFilters,
        outcome: &mut SearchOutcome,
    ) -> Result<Vec<RoomLink>, SearchError> {
        let mut links = Vec::new();
        let mut page_start = 1;
        let mut fetched = 0;

        loop {
            if fetched >= self.max_pages {
                warn!(
                    building = filters.building_category_id(),
                    usage = filters.usage_type_id(),
                    max_pages = self.max_pages,
                    "search never returned an empty page, stopping at page limit"
                );
                outcome.truncated = true;
                return Ok(links);
            }

            let body = self.portal.search(filters, page_start).await?;
            fetched += 1;
            outcome.pages += 1;

            let rows = {
                let html = Html::parse_document(&body);
                parse_result_rows(&html, self.portal.base_url(), page_start)?
            };

            if rows.is_empty() {
                debug!(page_start, "empty result page, search exhausted");
                return Ok(links);
            }

            let mut summary = PageSummary::default();
            for row in rows {
                match row {
                    RowOutcome::Parsed(link) => {
                        summary.parsed += 1;
                        links.push(link);
                    }
                    RowOutcome::Skipped => summary.skipped += 1,
                }
            }
            outcome.skipped += summary.skipped;

            debug!(
                page_start,
                rows = summary.rows(),
                parsed = summary.parsed,
                skipped = summary.skipped,
                "parsed result page"
            );

            page_start += PAGE_SIZE;
        }
    }
}
