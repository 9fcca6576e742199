pub mod error;
pub mod omdb;
pub mod traits;

pub use error::SourceError;
pub use omdb::{OmdbClient, OmdbSettings};
pub use traits::MetadataProvider;
