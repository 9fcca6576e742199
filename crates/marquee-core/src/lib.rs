pub mod bulk;
pub mod dedup;
pub mod error;
pub mod importer;
pub mod mapper;
pub mod store;

#[cfg(test)]
mod testing;

pub use bulk::{parse_id_list, BulkImporter, ImportProgress, ItemStatus};
pub use dedup::DedupGuard;
pub use error::{ImportError, MappingError, StoreError};
pub use importer::{ImportOutcome, Importer};
pub use mapper::{derive_slug, map_record, slugify, ImportTarget};
pub use store::{ContentStore, InMemoryContentStore, SqliteContentStore};
