//! Catalog persistence.
//!
//! The importer only needs three things from storage: look a title up by its
//! external id, insert a new row, and list what is there. Two backends ship:
//! an in-memory one for tests and throwaway servers, and SQLite.

use async_trait::async_trait;
use marquee_models::{ContentKind, ContentRecord, NewContentRecord};

use crate::error::StoreError;

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryContentStore;
pub use sqlite::SqliteContentStore;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Row of `kind` carrying `imdb_id`, if any
    async fn find_by_external_id(
        &self,
        kind: ContentKind,
        imdb_id: &str,
    ) -> Result<Option<ContentRecord>, StoreError>;

    /// Insert a row. Fails with [`StoreError::Conflict`] when the external id
    /// or the slug is already taken for that kind.
    async fn create(&self, record: NewContentRecord) -> Result<ContentRecord, StoreError>;

    /// All rows of `kind`, oldest first
    async fn list(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, StoreError>;
}
