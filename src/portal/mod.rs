//! Access to the room-booking portal.

pub mod client;
pub mod errors;

pub use client::PortalClient;
pub use errors::PortalError;

use crate::filters::SearchFilters;
use async_trait::async_trait;
use url::Url;

/// The two requests the pipeline needs from the portal, returning raw HTML.
///
/// `search` runs on a cookie-backed session and is only ever called
/// sequentially. `fetch_room_page` is stateless and may be called from many
/// workers at once.
#[async_trait]
pub trait Portal: Send + Sync {
    async fn search(&self, filters: &SearchFilters, page_start: usize)
    -> Result<String, PortalError>;

    async fn fetch_room_page(&self, url: &Url) -> Result<String, PortalError>;

    /// Base used to resolve relative links found in search results.
    fn base_url(&self) -> &Url;
}
