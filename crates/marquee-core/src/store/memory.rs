use async_trait::async_trait;
use chrono::Utc;
use marquee_models::{ContentKind, ContentRecord, NewContentRecord};
use tokio::sync::RwLock;

use super::ContentStore;
use crate::error::StoreError;

#[derive(Default)]
struct Rows {
    records: Vec<ContentRecord>,
    last_id: i64,
}

/// Process-local store with the same uniqueness rules as the SQLite tables
#[derive(Default)]
pub struct InMemoryContentStore {
    rows: RwLock<Rows>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn find_by_external_id(
        &self,
        kind: ContentKind,
        imdb_id: &str,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .records
            .iter()
            .find(|r| r.kind() == kind && r.imdb_id() == Some(imdb_id))
            .cloned())
    }

    async fn create(&self, record: NewContentRecord) -> Result<ContentRecord, StoreError> {
        // Check and insert under one write lock so concurrent creates can't both pass
        let mut rows = self.rows.write().await;

        if let Some(imdb_id) = record.imdb_id.as_deref() {
            if rows
                .records
                .iter()
                .any(|r| r.kind() == record.kind && r.imdb_id() == Some(imdb_id))
            {
                return Err(StoreError::Conflict {
                    kind: record.kind,
                    field: "imdb_id",
                    value: imdb_id.to_string(),
                });
            }
        }
        if rows
            .records
            .iter()
            .any(|r| r.kind() == record.kind && r.slug() == record.slug)
        {
            return Err(StoreError::Conflict {
                kind: record.kind,
                field: "slug",
                value: record.slug,
            });
        }

        rows.last_id += 1;
        let created = ContentRecord {
            id: rows.last_id,
            fields: record,
            created_at: Utc::now(),
        };
        rows.records.push(created.clone());
        Ok(created)
    }

    async fn list(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .records
            .iter()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_models::LocalizedText;

    fn row(kind: ContentKind, imdb_id: Option<&str>, slug: &str) -> NewContentRecord {
        NewContentRecord {
            kind,
            imdb_id: imdb_id.map(str::to_string),
            category_id: 1,
            language_id: 1,
            title: LocalizedText::uniform(slug),
            description: LocalizedText::uniform("plot"),
            slug: slug.to_string(),
            year: Some(2008),
            duration: None,
            rating: 7.5,
            poster: None,
            director: LocalizedText::uniform("someone"),
            cast: String::new(),
            genres: String::new(),
            total_seasons: None,
            is_active: true,
            is_premium: false,
            is_featured: false,
            views_count: 0,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryContentStore::new();
        let created = store
            .create(row(ContentKind::Movie, Some("tt0468569"), "the-dark-knight"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let found = store
            .find_by_external_id(ContentKind::Movie, "tt0468569")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, created);

        // Same id under the other kind is a different row
        assert!(store
            .find_by_external_id(ContentKind::Series, "tt0468569")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_external_id_conflicts() {
        let store = InMemoryContentStore::new();
        store
            .create(row(ContentKind::Movie, Some("tt1"), "one"))
            .await
            .unwrap();
        let err = store
            .create(row(ContentKind::Movie, Some("tt1"), "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { field: "imdb_id", .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let store = InMemoryContentStore::new();
        store
            .create(row(ContentKind::Series, Some("tt1"), "batman"))
            .await
            .unwrap();
        let err = store
            .create(row(ContentKind::Series, Some("tt2"), "batman"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { field: "slug", .. }));

        // Slugs are unique per table, so a movie may reuse it
        store
            .create(row(ContentKind::Movie, Some("tt3"), "batman"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rows_without_external_id() {
        let store = InMemoryContentStore::new();
        store.create(row(ContentKind::Movie, None, "a")).await.unwrap();
        store.create(row(ContentKind::Movie, None, "b")).await.unwrap();

        let movies = store.list(ContentKind::Movie).await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].slug(), "a");
        assert!(store.list(ContentKind::Series).await.unwrap().is_empty());
    }
}
