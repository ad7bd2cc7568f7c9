//! Search filters sent to the portal's room search form.

use crate::catalog::{Building, Usage};
use regex::Regex;
use std::sync::LazyLock;

/// Characters the portal ignores when counting meaningful search characters.
static QUALIFYING_CHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^*%_?.,;:\-'"!/\\()+&#\s]"#).unwrap());

/// At least two consecutive characters that are not wildcard markers.
static NON_WILDCARD_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^*%]{2,}").unwrap());

const MIN_QUALIFYING_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "search text {text:?} needs at least {MIN_QUALIFYING_CHARS} characters that are not punctuation or wildcards (found {found})"
    )]
    TooFewCharacters { text: String, found: usize },
    #[error("search text {text:?} needs at least two consecutive characters besides '*' and '%'")]
    WildcardsOnly { text: String },
    #[error("worker count must be at least 1")]
    ZeroWorkers,
}

/// Validate free-text search input the same way the portal does.
///
/// Empty text means "no text filter" and is always accepted.
pub fn validate_search_text(text: &str) -> Result<(), ConfigError> {
    if text.is_empty() {
        return Ok(());
    }

    let found = QUALIFYING_CHAR_RE.find_iter(text).count();
    if found < MIN_QUALIFYING_CHARS {
        return Err(ConfigError::TooFewCharacters {
            text: text.to_owned(),
            found,
        });
    }

    if !NON_WILDCARD_RUN_RE.is_match(text) {
        return Err(ConfigError::WildcardsOnly {
            text: text.to_owned(),
        });
    }

    Ok(())
}

/// One search request's worth of filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    search_text: String,
    building_category_id: u32,
    usage_type_id: u32,
}

impl SearchFilters {
    pub fn new(
        search_text: impl Into<String>,
        building: Building,
        usage: Usage,
    ) -> Result<Self, ConfigError> {
        Self::from_ids(search_text, building.id(), usage.id())
    }

    /// Build filters from raw portal ids.
    pub fn from_ids(
        search_text: impl Into<String>,
        building_category_id: u32,
        usage_type_id: u32,
    ) -> Result<Self, ConfigError> {
        let search_text = search_text.into();
        validate_search_text(&search_text)?;
        Ok(Self {
            search_text,
            building_category_id,
            usage_type_id,
        })
    }

    /// Every (building, usage) combination for the given search text, buildings outermost.
    pub fn combinations(
        search_text: &str,
        buildings: &[Building],
        usages: &[Usage],
    ) -> Result<Vec<Self>, ConfigError> {
        validate_search_text(search_text)?;
        Ok(buildings
            .iter()
            .flat_map(|&building| {
                usages.iter().map(move |&usage| Self {
                    search_text: search_text.to_owned(),
                    building_category_id: building.id(),
                    usage_type_id: usage.id(),
                })
            })
            .collect())
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn building_category_id(&self) -> u32 {
        self.building_category_id
    }

    pub fn usage_type_id(&self) -> u32 {
        self.usage_type_id
    }

    /// Form fields for the search POST, starting at the 1-based row `page_start`.
    pub fn form_fields(&self, page_start: usize) -> Vec<(&'static str, String)> {
        vec![
            ("pStart", page_start.to_string()),
            ("pSuchbegriff", self.search_text.clone()),
            ("pGebaeudebereich", self.building_category_id.to_string()),
            ("pGebaeude", "0".to_string()),
            ("pVerwendung", self.usage_type_id.to_string()),
            ("pVerwalter", "1".to_string()),
        ]
    }
}
