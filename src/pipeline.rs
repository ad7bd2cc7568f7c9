//! End-to-end run: search, resolve, rank.

use crate::aggregate::{AggregateError, ConcurrentAggregator};
use crate::filters::SearchFilters;
use crate::portal::Portal;
use crate::room::{PORTAL_TZ, RoomAvailabilityResolver, RoomReport};
use crate::search::{SearchError, SearchPaginator};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("room search failed")]
    Search(#[from] SearchError),
    #[error("room lookup failed")]
    Aggregate(#[from] AggregateError),
}

/// Knobs for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub workers: usize,
    pub max_pages: usize,
    pub nav_base: Option<Url>,
}

/// Current instant in the portal's time zone.
pub fn portal_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&PORTAL_TZ)
}

/// Search all filter combinations and resolve every room found.
///
/// `clock` is read once, after the search has finished, so every room is
/// judged against the same instant. The returned reports are unranked.
pub async fn run<P: Portal + ?Sized + 'static>(
    portal: Arc<P>,
    filters: &[SearchFilters],
    options: &RunOptions,
    clock: impl FnOnce() -> DateTime<Tz>,
) -> Result<Vec<RoomReport>, PipelineError> {
    let outcome = SearchPaginator::new(portal.as_ref(), options.max_pages)
        .fetch_all(filters)
        .await?;

    let now = clock();
    let resolver = RoomAvailabilityResolver::new(portal, options.nav_base.clone());
    let reports = ConcurrentAggregator::new(resolver)
        .aggregate(outcome.links, options.workers, now)
        .await?;

    let free = reports
        .iter()
        .filter(|r| r.signal.is_some_and(|s| s.is_free()))
        .count();
    info!(rooms = reports.len(), free, "availability summary");

    Ok(reports)
}
