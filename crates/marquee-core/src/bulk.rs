use marquee_models::{ContentKind, ImportSummary};
use serde::Serialize;
use tracing::{info, warn};

use crate::importer::{ImportOutcome, Importer};

/// Per-item status handed to progress observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum ItemStatus {
    Created,
    Existing,
    Failed(String),
}

/// Emitted after each item of a batch
#[derive(Debug, Clone, Serialize)]
pub struct ImportProgress {
    /// Zero-based position in the input
    pub index: usize,
    pub total: usize,
    pub external_id: String,
    pub status: ItemStatus,
}

/// Runs a list of ids through [`Importer`] one at a time
#[derive(Clone)]
pub struct BulkImporter {
    importer: Importer,
}

impl BulkImporter {
    pub fn new(importer: Importer) -> Self {
        Self { importer }
    }

    pub async fn import_many(
        &self,
        ids: &[String],
        kind: ContentKind,
        category_id: i64,
        language_id: i64,
    ) -> ImportSummary {
        self.import_many_with_progress(ids, kind, category_id, language_id, |_| {})
            .await
    }

    /// Like [`import_many`](Self::import_many), calling `on_progress` after every item.
    ///
    /// Items run strictly in input order and failures never stop the batch.
    /// Repeated ids are attempted again; the repeat finds the stored row and
    /// counts as a success.
    pub async fn import_many_with_progress<F>(
        &self,
        ids: &[String],
        kind: ContentKind,
        category_id: i64,
        language_id: i64,
        on_progress: F,
    ) -> ImportSummary
    where
        F: Fn(&ImportProgress) + Send + Sync,
    {
        let total = ids.len();
        let mut summary = ImportSummary::default();
        info!(total, %kind, "Starting bulk import");

        for (index, external_id) in ids.iter().enumerate() {
            let status = match self
                .importer
                .import_one(external_id, kind, category_id, language_id)
                .await
            {
                Ok(outcome) => {
                    summary.success_count += 1;
                    let status = match &outcome {
                        ImportOutcome::Created(_) => {
                            summary.created_count += 1;
                            ItemStatus::Created
                        }
                        ImportOutcome::Existing(_) => ItemStatus::Existing,
                    };
                    summary.records.push(outcome.into_record());
                    status
                }
                Err(e) => {
                    summary.failure_count += 1;
                    summary.errors.push(format!("{}: {}", external_id, e));
                    ItemStatus::Failed(e.to_string())
                }
            };

            on_progress(&ImportProgress {
                index,
                total,
                external_id: external_id.clone(),
                status,
            });
        }

        if summary.is_clean() {
            info!(
                success = summary.success_count,
                created = summary.created_count,
                "Bulk import finished"
            );
        } else {
            warn!(
                success = summary.success_count,
                failed = summary.failure_count,
                created = summary.created_count,
                "Bulk import finished with failures"
            );
        }
        summary
    }
}

/// Split pasted text into ids: newline or comma separated, trimmed, blanks
/// dropped. Order and repeats are kept.
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.split(|c| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentStore, InMemoryContentStore};
    use crate::testing::FakeProvider;
    use std::sync::{Arc, Mutex};

    fn bulk() -> (BulkImporter, Arc<InMemoryContentStore>) {
        let store = Arc::new(InMemoryContentStore::new());
        let importer = Importer::new(Arc::new(FakeProvider::catalog()), store.clone());
        (BulkImporter::new(importer), store)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let (bulk, store) = bulk();
        let summary = bulk
            .import_many(&ids(&["tt1", "tt2", "bad"]), ContentKind::Movie, 1, 1)
            .await;

        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.created_count, 2);
        assert_eq!(summary.errors, vec!["bad: Incorrect IMDb ID.".to_string()]);
        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.records[0].imdb_id(), Some("tt1"));
        assert_eq!(summary.records[1].imdb_id(), Some("tt2"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_repeated_ids_count_as_successes() {
        let (bulk, store) = bulk();
        let summary = bulk
            .import_many(&ids(&["tt1", "tt1"]), ContentKind::Movie, 1, 1)
            .await;

        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.created_count, 1);
        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.records[0], summary.records[1]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_kind_mismatch_in_batch() {
        let (bulk, store) = bulk();
        let summary = bulk
            .import_many(&ids(&["tt0903747", "tt0468569"]), ContentKind::Series, 2, 1)
            .await;

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(
            summary.errors,
            vec!["tt0468569: content tt0468569 is a 'movie', not a series".to_string()]
        );
        assert_eq!(store.list(ContentKind::Series).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (bulk, _store) = bulk();
        let summary = bulk.import_many(&[], ContentKind::Movie, 1, 1).await;
        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn test_progress_is_reported_in_order() {
        let (bulk, _store) = bulk();
        let seen = Mutex::new(Vec::new());
        bulk.import_many_with_progress(
            &ids(&["tt1", "bad", "tt1"]),
            ContentKind::Movie,
            1,
            1,
            |p| seen.lock().unwrap().push((p.index, p.total, p.status.clone())),
        )
        .await;

        let seen = seen.into_inner().unwrap();
        assert_eq!(
            seen,
            vec![
                (0, 3, ItemStatus::Created),
                (1, 3, ItemStatus::Failed("Incorrect IMDb ID.".to_string())),
                (2, 3, ItemStatus::Existing),
            ]
        );
    }

    #[test]
    fn test_parse_id_list() {
        let text = "tt0468569\n  tt0903747 ,tt1\n\n , \ntt0468569\r\n";
        assert_eq!(
            parse_id_list(text),
            ids(&["tt0468569", "tt0903747", "tt1", "tt0468569"])
        );
        assert!(parse_id_list("  \n ").is_empty());
    }
}
