use std::sync::Arc;

use chrono::Utc;
use marquee_models::{ContentKind, ContentRecord};
use marquee_sources::MetadataProvider;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::dedup::DedupGuard;
use crate::error::{ImportError, MappingError};
use crate::mapper::{self, ImportTarget};
use crate::store::ContentStore;

/// What a successful import did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "record", rename_all = "lowercase")]
pub enum ImportOutcome {
    /// A new row was written
    Created(ContentRecord),
    /// The title was already in the catalog; nothing was written
    Existing(ContentRecord),
}

impl ImportOutcome {
    pub fn record(&self) -> &ContentRecord {
        match self {
            ImportOutcome::Created(r) | ImportOutcome::Existing(r) => r,
        }
    }

    pub fn into_record(self) -> ContentRecord {
        match self {
            ImportOutcome::Created(r) | ImportOutcome::Existing(r) => r,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, ImportOutcome::Created(_))
    }
}

/// Pulls one title from the provider into the catalog
#[derive(Clone)]
pub struct Importer {
    provider: Arc<dyn MetadataProvider>,
    store: Arc<dyn ContentStore>,
    dedup: DedupGuard,
}

impl Importer {
    pub fn new(provider: Arc<dyn MetadataProvider>, store: Arc<dyn ContentStore>) -> Self {
        let dedup = DedupGuard::new(store.clone());
        Self {
            provider,
            store,
            dedup,
        }
    }

    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Import `external_id` as `kind`.
    ///
    /// Order: fetch, series kind check, dedup, map, create. A kind mismatch
    /// is reported even when a row with that id already exists, and at most
    /// one row is written.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn import_one(
        &self,
        external_id: &str,
        kind: ContentKind,
        category_id: i64,
        language_id: i64,
    ) -> Result<ImportOutcome, ImportError> {
        let target = ImportTarget::new(kind, category_id, language_id);
        let result = self.run(external_id.trim(), &target).await;

        match &result {
            Ok(ImportOutcome::Created(record)) => info!(
                id = record.id,
                slug = record.slug(),
                "Imported {} '{}'",
                kind,
                record.display_title()
            ),
            Ok(ImportOutcome::Existing(record)) => {
                debug!(id = record.id, "Already in the catalog, skipping")
            }
            Err(e) => error!(category = e.category(), "Import failed: {}", e),
        }
        result
    }

    pub async fn import_movie(
        &self,
        external_id: &str,
        category_id: i64,
        language_id: i64,
    ) -> Result<ImportOutcome, ImportError> {
        self.import_one(external_id, ContentKind::Movie, category_id, language_id)
            .await
    }

    pub async fn import_series(
        &self,
        external_id: &str,
        category_id: i64,
        language_id: i64,
    ) -> Result<ImportOutcome, ImportError> {
        self.import_one(external_id, ContentKind::Series, category_id, language_id)
            .await
    }

    async fn run(&self, external_id: &str, target: &ImportTarget) -> Result<ImportOutcome, ImportError> {
        if external_id.trim().is_empty() {
            return Err(MappingError::MissingField("imdbID").into());
        }

        let record = self.provider.details(external_id).await?;
        mapper::validate_kind(&record, target.kind)?;

        // Rows are stored under the provider's id, so look that one up
        let stored_id = record.imdb_id.trim();
        if stored_id.is_empty() {
            return Err(MappingError::MissingField("imdbID").into());
        }
        if let Some(existing) = self.dedup.existing(stored_id, target.kind).await? {
            return Ok(ImportOutcome::Existing(existing));
        }

        let row = mapper::map_record(&record, target, Utc::now())?;
        let created = self.store.create(row).await?;
        Ok(ImportOutcome::Created(created))
    }
}
