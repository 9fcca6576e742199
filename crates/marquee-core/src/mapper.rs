//! Provider record → catalog row.
//!
//! Everything here is pure: no I/O, and the clock is passed in so slug
//! fallbacks are reproducible.

use chrono::{DateTime, Utc};
use marquee_models::{ContentKind, ExternalRecord, LocalizedText, NewContentRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MappingError;

static FOUR_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}").expect("year regex should compile"));
static DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digits regex should compile"));
static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?[0-9]+").expect("integer regex should compile"));
static LEADING_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)").expect("decimal regex should compile")
});

const NOT_AVAILABLE: &str = "N/A";

const UNTITLED: (&str, &str) = ("بدون عنوان", "Untitled");
const NO_DESCRIPTION: (&str, &str) = ("لا يوجد وصف", "No description");
const UNKNOWN_DIRECTOR: (&str, &str) = ("غير معروف", "Unknown");

/// Where an import lands in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportTarget {
    pub kind: ContentKind,
    pub category_id: i64,
    pub language_id: i64,
}

impl ImportTarget {
    pub fn new(kind: ContentKind, category_id: i64, language_id: i64) -> Self {
        Self {
            kind,
            category_id,
            language_id,
        }
    }
}

/// First four-digit run: "2019–2024" → 2019, "N/A" → None
pub fn extract_year(raw: &str) -> Option<i32> {
    FOUR_DIGITS.find(raw).and_then(|m| m.as_str().parse().ok())
}

/// First integer run: "148 min" → 148, "N/A" → None
pub fn extract_duration(raw: &str) -> Option<i32> {
    DIGITS.find(raw).and_then(|m| m.as_str().parse().ok())
}

/// Decimal rating with comma tolerance. Anything unparseable is 0.0, not an error.
pub fn extract_rating(raw: &str) -> f64 {
    let normalized = raw.replace(',', ".");
    LEADING_DECIMAL
        .find(&normalized)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Leading integer or 0, used for season counts
pub fn extract_count(raw: &str) -> i32 {
    LEADING_INTEGER
        .find(raw)
        .and_then(|m| m.as_str().trim().parse().ok())
        .unwrap_or(0)
}

/// Poster URL unless blank or the provider placeholder
pub fn poster_url(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|p| !p.is_empty() && *p != NOT_AVAILABLE)
        .map(str::to_string)
}

// Arabic harakat, tanween and the superscript alef
fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Lowercase, keep letters and digits in any script, collapse the rest to '-'
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for ch in text.trim().chars() {
        if is_arabic_diacritic(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Slug from the Arabic title, else the English one, else "{kind}-{timestamp}"
pub fn derive_slug(title: &LocalizedText, kind: ContentKind, now: DateTime<Utc>) -> String {
    [title.ar.as_str(), title.en.as_str()]
        .into_iter()
        .map(slugify)
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| format!("{}-{}", kind, now.timestamp()))
}

fn text_or(value: Option<&str>, fallback: (&str, &str)) -> LocalizedText {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => LocalizedText::uniform(v),
        None => LocalizedText::new(fallback.0, fallback.1),
    }
}

/// Check that the provider agrees with the requested kind.
///
/// Series imports require the provider type "series". Movie imports accept
/// whatever the provider says.
pub fn validate_kind(record: &ExternalRecord, kind: ContentKind) -> Result<(), MappingError> {
    if kind == ContentKind::Series && record.kind.trim() != ContentKind::Series.as_str() {
        return Err(MappingError::KindMismatch {
            imdb_id: record.imdb_id.clone(),
            expected: kind,
            actual: record.kind.clone(),
        });
    }
    Ok(())
}

/// Build the catalog row for `record`
pub fn map_record(
    record: &ExternalRecord,
    target: &ImportTarget,
    now: DateTime<Utc>,
) -> Result<NewContentRecord, MappingError> {
    let imdb_id = record.imdb_id.trim();
    if imdb_id.is_empty() {
        return Err(MappingError::MissingField("imdbID"));
    }
    validate_kind(record, target.kind)?;

    let provider_title = record
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or_default();
    let slug = derive_slug(&LocalizedText::uniform(provider_title), target.kind, now);

    let (duration, total_seasons) = match target.kind {
        ContentKind::Movie => (record.runtime.as_deref().and_then(extract_duration), None),
        ContentKind::Series => (
            None,
            Some(record.total_seasons.as_deref().map(extract_count).unwrap_or(0)),
        ),
    };

    Ok(NewContentRecord {
        kind: target.kind,
        imdb_id: Some(imdb_id.to_string()),
        category_id: target.category_id,
        language_id: target.language_id,
        title: text_or(record.title.as_deref(), UNTITLED),
        description: text_or(record.plot.as_deref(), NO_DESCRIPTION),
        slug,
        year: record.year.as_deref().and_then(extract_year),
        duration,
        rating: record.rating.as_deref().map(extract_rating).unwrap_or(0.0),
        poster: poster_url(record.poster.as_deref()),
        director: text_or(record.director.as_deref(), UNKNOWN_DIRECTOR),
        cast: record.actors.clone().unwrap_or_default(),
        genres: record.genre.clone().unwrap_or_default(),
        total_seasons,
        is_active: true,
        is_premium: false,
        is_featured: false,
        views_count: 0,
    })
}
