use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContentKind, LocalizedText};

/// A catalog row that has been mapped but not yet persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewContentRecord {
    pub kind: ContentKind,
    pub imdb_id: Option<String>,
    pub category_id: i64,
    pub language_id: i64,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub slug: String,
    pub year: Option<i32>,
    /// Minutes, movies only
    pub duration: Option<i32>,
    pub rating: f64,
    pub poster: Option<String>,
    pub director: LocalizedText,
    pub cast: String,
    pub genres: String,
    /// Series only
    pub total_seasons: Option<i32>,
    pub is_active: bool,
    pub is_premium: bool,
    pub is_featured: bool,
    pub views_count: i64,
}

/// A persisted movie or series row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRecord {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewContentRecord,
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    pub fn kind(&self) -> ContentKind {
        self.fields.kind
    }

    pub fn imdb_id(&self) -> Option<&str> {
        self.fields.imdb_id.as_deref()
    }

    pub fn slug(&self) -> &str {
        &self.fields.slug
    }

    /// English title, for log lines and terminal output
    pub fn display_title(&self) -> &str {
        let title = &self.fields.title;
        if title.en.trim().is_empty() {
            &title.ar
        } else {
            &title.en
        }
    }
}
