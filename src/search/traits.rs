use crate::models::SearchResponse;
use crate::search::errors::SearchError;
use async_trait::async_trait;

/// Natural-language search endpoint.
/// Implemented over HTTP in production and by in-memory fakes in tests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search for an already-trimmed query
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;

    /// Get the name of the backend
    fn name(&self) -> &'static str;
}
