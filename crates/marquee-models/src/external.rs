use serde::{Deserialize, Serialize};

/// A single hit from a provider title search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSummary {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    /// Provider type string ("movie", "series", "episode", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub poster: Option<String>,
}

/// One page of search results plus the provider's total hit count
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchPage {
    pub results: Vec<SearchSummary>,
    pub total: u64,
}

/// Full title details as returned by the metadata provider.
///
/// Every text field is kept verbatim (including placeholders like "N/A");
/// interpretation happens in the field mapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalRecord {
    pub imdb_id: String,
    /// Provider type string, not yet validated against a `ContentKind`
    pub kind: String,
    pub title: Option<String>,
    pub plot: Option<String>,
    /// May be a range such as "2019–2024"
    pub year: Option<String>,
    /// e.g. "148 min"
    pub runtime: Option<String>,
    /// Decimal string, possibly with a comma separator
    pub rating: Option<String>,
    pub poster: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub genre: Option<String>,
    pub total_seasons: Option<String>,
    /// Untouched provider payload
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl ExternalRecord {
    /// Minimal record, handy for tests and fakes
    pub fn new(imdb_id: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            kind: kind.into(),
            title: Some(title.into()),
            plot: None,
            year: None,
            runtime: None,
            rating: None,
            poster: None,
            director: None,
            actors: None,
            genre: None,
            total_seasons: None,
            raw: serde_json::Value::Null,
        }
    }
}
