use async_trait::async_trait;

use super::EnrichError;

/// Turns a bare task title into a one-sentence description. Replies are
/// advisory: an empty string means the model had nothing useful to say,
/// and callers treat failures the same way.
#[async_trait]
pub trait Enricher {
    async fn refine_description(&self, title: &str) -> Result<String, EnrichError>;
}
