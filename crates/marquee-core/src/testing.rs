//! In-process provider used by the importer tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use marquee_models::{ContentKind, ExternalRecord, SearchPage};
use marquee_sources::{MetadataProvider, SourceError};

pub struct FakeProvider {
    records: HashMap<String, ExternalRecord>,
    calls: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn empty() -> Self {
        Self {
            records: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A movie, a series and two short ids for batch tests
    pub fn catalog() -> Self {
        let mut dark_knight = ExternalRecord::new("tt0468569", "movie", "The Dark Knight");
        dark_knight.year = Some("2008".to_string());
        dark_knight.runtime = Some("152 min".to_string());
        dark_knight.rating = Some("9.0".to_string());

        let mut breaking_bad = ExternalRecord::new("tt0903747", "series", "Breaking Bad");
        breaking_bad.year = Some("2008–2013".to_string());
        breaking_bad.total_seasons = Some("5".to_string());

        Self::empty()
            .with(dark_knight)
            .with(breaking_bad)
            .with(ExternalRecord::new("tt1", "movie", "First"))
            .with(ExternalRecord::new("tt2", "movie", "Second"))
    }

    pub fn with(mut self, record: ExternalRecord) -> Self {
        self.records.insert(record.imdb_id.clone(), record);
        self
    }

    /// Answer `external_id` with a record whose own id may differ
    pub fn serving(mut self, external_id: &str, record: ExternalRecord) -> Self {
        self.records.insert(external_id.to_string(), record);
        self
    }

    /// Shared counter of `details` calls
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn search(
        &self,
        _query: &str,
        _kind: Option<ContentKind>,
        _page: u32,
    ) -> Result<SearchPage, SourceError> {
        Err(SourceError::provider("Movie not found!"))
    }

    async fn details(&self, external_id: &str) -> Result<ExternalRecord, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(external_id)
            .cloned()
            .ok_or_else(|| SourceError::not_found("Incorrect IMDb ID."))
    }
}
