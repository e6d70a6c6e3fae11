use async_trait::async_trait;

use crate::error::RecommendResult;

/// Turns a query into a vector in the same space as the assessment index.
///
/// The model behind an implementation must be the one the index was built
/// with; otherwise distances are meaningless.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn encode(&self, text: &str) -> RecommendResult<Vec<f32>>;
}
