use std::sync::Arc;

use marquee_core::{BulkImporter, ContentStore, Importer};
use marquee_sources::MetadataProvider;

#[derive(Clone)]
pub struct AppState {
    pub importer: Importer,
    pub bulk: BulkImporter,
    /// Used when an import request leaves out `language_id`
    pub default_language_id: i64,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        store: Arc<dyn ContentStore>,
        default_language_id: i64,
    ) -> Self {
        let importer = Importer::new(provider, store);
        Self {
            bulk: BulkImporter::new(importer.clone()),
            importer,
            default_language_id,
        }
    }

    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        self.importer.provider()
    }
}
