use crate::error::Result;

/// Movie details fetched from the external metadata database.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub imdb_id: Option<String>,
    pub country: String,
}

/// Primary lookup used by the add-movie flow. A lookup that cannot find the
/// title returns [`crate::error::AppError::MovieNotFound`].
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn lookup(&self, title: &str) -> Result<MovieMetadata>;
}

/// Best-effort soundtrack link lookup. Callers treat any error as "no link".
#[async_trait::async_trait]
pub trait SoundtrackProvider: Send + Sync {
    async fn soundtrack_url(&self, title: &str) -> Result<Option<String>>;
}
