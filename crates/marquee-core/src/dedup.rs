use std::sync::Arc;

use marquee_models::{ContentKind, ContentRecord};

use crate::error::StoreError;
use crate::store::ContentStore;

/// Answers "is this title already in the catalog?".
///
/// The key is `(kind, external id)`: a movie and a series may carry the same
/// literal id without colliding.
#[derive(Clone)]
pub struct DedupGuard {
    store: Arc<dyn ContentStore>,
}

impl DedupGuard {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn existing(
        &self,
        external_id: &str,
        kind: ContentKind,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Ok(None);
        }
        self.store.find_by_external_id(kind, external_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryContentStore;
    use marquee_models::{LocalizedText, NewContentRecord};

    fn movie(imdb_id: &str) -> NewContentRecord {
        NewContentRecord {
            kind: ContentKind::Movie,
            imdb_id: Some(imdb_id.to_string()),
            category_id: 1,
            language_id: 1,
            title: LocalizedText::uniform("Heat"),
            description: LocalizedText::uniform("plot"),
            slug: "heat".to_string(),
            year: Some(1995),
            duration: Some(170),
            rating: 8.3,
            poster: None,
            director: LocalizedText::uniform("Michael Mann"),
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
    async fn test_existing_is_keyed_by_kind_and_id() {
        let store = Arc::new(InMemoryContentStore::new());
        store.create(movie("tt0113277")).await.unwrap();
        let guard = DedupGuard::new(store);

        let hit = guard.existing(" tt0113277 ", ContentKind::Movie).await.unwrap();
        assert_eq!(hit.map(|r| r.slug().to_string()), Some("heat".to_string()));

        assert!(guard.existing("tt0113277", ContentKind::Series).await.unwrap().is_none());
        assert!(guard.existing("tt9999999", ContentKind::Movie).await.unwrap().is_none());
        assert!(guard.existing("", ContentKind::Movie).await.unwrap().is_none());
    }
}
