use async_trait::async_trait;
use marquee_models::{ContentKind, ExternalRecord, SearchPage};

use crate::SourceError;

/// A movie/TV metadata provider the importer can pull titles from
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Title search. `page` starts at 1; `kind` narrows to movies or series.
    /// The query is passed through as is; callers validate its length.
    async fn search(
        &self,
        query: &str,
        kind: Option<ContentKind>,
        page: u32,
    ) -> Result<SearchPage, SourceError>;

    /// Full details for one external id, `SourceError::NotFound` when unknown
    async fn details(&self, external_id: &str) -> Result<ExternalRecord, SourceError>;
}
