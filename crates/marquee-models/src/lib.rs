pub mod content;
pub mod external;
pub mod kind;
pub mod localized;
pub mod summary;

pub use content::{ContentRecord, NewContentRecord};
pub use external::{ExternalRecord, SearchPage, SearchSummary};
pub use kind::{ContentKind, ParseKindError};
pub use localized::LocalizedText;
pub use summary::ImportSummary;
