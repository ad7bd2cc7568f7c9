//! reqwest-backed portal client.

use super::{Portal, PortalError};
use crate::config::Config;
use crate::filters::SearchFilters;
use async_trait::async_trait;
use std::time::Duration;
use tracing::trace;
use url::Url;

const USER_AGENT: &str = concat!("roomfinder/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the room portal.
///
/// Search paging needs server-assigned cookies to stay consistent, so it goes
/// through a cookie-backed `session`. Room pages are public and fetched with a
/// separate cookie-less client that can be shared freely between workers.
pub struct PortalClient {
    session: reqwest::Client,
    http: reqwest::Client,
    base_url: Url,
    search_url: Url,
}

impl PortalClient {
    pub fn new(base_url: Url, search_path: &str, timeout: Duration) -> Result<Self, PortalError> {
        let search_url = base_url.join(search_path)?;

        let session = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(PortalError::ClientBuild)?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(PortalError::ClientBuild)?;

        Ok(Self {
            session,
            http,
            base_url,
            search_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PortalError> {
        let base_url = Url::parse(&config.portal_base_url)?;
        Self::new(base_url, &config.search_path, config.request_timeout)
    }

    async fn read_body(response: reqwest::Response, url: &str) -> Result<String, PortalError> {
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::BadStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| PortalError::RequestFailed {
                url: url.to_owned(),
                source,
            })
    }
}

#[async_trait]
impl Portal for PortalClient {
    async fn search(
        &self,
        filters: &SearchFilters,
        page_start: usize,
    ) -> Result<String, PortalError> {
        let url = self.search_url.as_str();
        trace!(url, page_start, "POST room search");

        let response = self
            .session
            .post(self.search_url.clone())
            .form(&filters.form_fields(page_start))
            .send()
            .await
            .map_err(|source| PortalError::RequestFailed {
                url: url.to_owned(),
                source,
            })?;

        Self::read_body(response, url).await
    }

    async fn fetch_room_page(&self, url: &Url) -> Result<String, PortalError> {
        trace!(url = url.as_str(), "GET room page");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| PortalError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        Self::read_body(response, url.as_str()).await
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}
