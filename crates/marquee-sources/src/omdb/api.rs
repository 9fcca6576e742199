use marquee_models::{ExternalRecord, SearchPage, SearchSummary};
use serde::Deserialize;

use crate::SourceError;

/// OMDB's marker for a missing value
pub const NOT_AVAILABLE: &str = "N/A";

const DEFAULT_SEARCH_ERROR: &str = "Search failed";
const DEFAULT_DETAILS_ERROR: &str = "Content not found";

/// Envelope fields present on every OMDB response
#[derive(Debug, Deserialize)]
struct OmdbStatus {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbStatus {
    fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type", default)]
    item_type: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbTitle {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Type", default)]
    item_type: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "totalSeasons")]
    total_seasons: Option<String>,
}

fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != NOT_AVAILABLE)
}

/// Decode a `?s=` response body
pub fn decode_search(body: &str) -> Result<SearchPage, SourceError> {
    let raw: serde_json::Value = serde_json::from_str(body)?;
    let status: OmdbStatus = serde_json::from_value(raw.clone())?;
    if !status.is_success() {
        return Err(SourceError::provider(
            status.error.unwrap_or_else(|| DEFAULT_SEARCH_ERROR.to_string()),
        ));
    }

    let response: OmdbSearchResponse = serde_json::from_value(raw)?;
    let total = response
        .total_results
        .as_deref()
        .and_then(|t| t.trim().parse::<u64>().ok())
        .unwrap_or(0);

    let results = response
        .search
        .into_iter()
        .map(|item| SearchSummary {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            kind: item.item_type,
            poster: available(item.poster),
        })
        .collect();

    Ok(SearchPage { results, total })
}

/// Decode an `?i=` response body, keeping the raw payload on the record
pub fn decode_details(body: &str) -> Result<ExternalRecord, SourceError> {
    let raw: serde_json::Value = serde_json::from_str(body)?;
    let status: OmdbStatus = serde_json::from_value(raw.clone())?;
    if !status.is_success() {
        return Err(SourceError::not_found(
            status.error.unwrap_or_else(|| DEFAULT_DETAILS_ERROR.to_string()),
        ));
    }

    let title: OmdbTitle = serde_json::from_value(raw.clone())?;
    Ok(ExternalRecord {
        imdb_id: title.imdb_id,
        kind: title.item_type,
        title: title.title,
        plot: title.plot,
        year: title.year,
        runtime: title.runtime,
        rating: title.imdb_rating,
        poster: title.poster,
        director: title.director,
        actors: title.actors,
        genre: title.genre,
        total_seasons: title.total_seasons,
        raw,
    })
}
