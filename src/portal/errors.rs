//! Error types for the portal client.

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("request to {url} failed")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("portal answered {status} for {url}")]
    BadStatus { status: u16, url: String },
    #[error("invalid portal URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
