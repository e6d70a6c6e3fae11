mod openai;
mod provider;

pub use openai::{EmbeddingConfig, OpenAiEmbedder};
pub use provider::Embedder;

#[cfg(test)]
pub use provider::MockEmbedder;
