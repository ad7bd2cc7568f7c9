//! Runtime configuration.
//!
//! Values come from built-in defaults, then an optional `roomfinder.toml` in
//! the working directory, then `ROOMFINDER_`-prefixed environment variables.

use anyhow::Context;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

pub const CONFIG_FILE: &str = "roomfinder.toml";
pub const ENV_PREFIX: &str = "ROOMFINDER_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base level for this crate's log output (`trace` .. `error`).
    pub log_level: String,
    /// Portal root; search and room links are resolved against it.
    pub portal_base_url: String,
    /// Search endpoint, relative to `portal_base_url`.
    pub search_path: String,
    /// Room ids are appended to this to build navigation links.
    pub nav_base_url: String,
    /// Per-request timeout, written as a human duration such as `30s` or `1m`.
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub request_timeout: Duration,
    /// Upper bound on search result pages fetched per filter combination.
    pub max_pages: usize,
    /// Worker count when `--threads` is not given.
    pub default_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            portal_base_url: "https://campus.tum.de/tumonline/".to_string(),
            search_path: "wbSuche.raumSuche".to_string(),
            nav_base_url: "https://nav.tum.de/room/".to_string(),
            request_timeout: Duration::from_secs(30),
            max_pages: 100,
            default_threads: 4,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::figment()
            .extract()
            .context("Failed to load configuration")
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => fundu::parse_duration(&text)
            .map_err(|e| serde::de::Error::custom(format!("invalid duration {text:?}: {e}"))),
    }
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{}ms", duration.as_millis()))
}
