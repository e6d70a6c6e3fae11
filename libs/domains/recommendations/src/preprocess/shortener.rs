use async_trait::async_trait;

use crate::error::RecommendResult;

/// Upper bound on whitespace-separated tokens kept from a shortened query.
pub const MAX_KEYWORDS: usize = 10;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryShortener: Send + Sync {
    /// Condense `query` into search keywords.
    async fn shorten(&self, query: &str) -> RecommendResult<String>;
}

/// Returns the query untouched. Used when preprocessing is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughShortener;

#[async_trait]
impl QueryShortener for PassthroughShortener {
    async fn shorten(&self, query: &str) -> RecommendResult<String> {
        Ok(query.to_string())
    }
}

/// Keep the first `max` whitespace-separated tokens, joined by single spaces.
pub fn truncate_keywords(text: &str, max: usize) -> String {
    text.split_whitespace().take(max).collect::<Vec<_>>().join(" ")
}

/// Instruction sent to the language model for a given query.
pub fn keyword_prompt(query: &str) -> String {
    format!(
        "Extract the key skills, roles and requirements from the following hiring \
         query as a short list of search keywords. Reply with at most {} \
         space-separated words and nothing else.\n\nQuery: {}",
        MAX_KEYWORDS, query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keywords() {
        let long = "one two three four five six seven eight nine ten eleven twelve";
        assert_eq!(
            truncate_keywords(long, MAX_KEYWORDS),
            "one two three four five six seven eight nine ten"
        );
        assert_eq!(truncate_keywords("  java \n  sql ", MAX_KEYWORDS), "java sql");
        assert_eq!(truncate_keywords("", MAX_KEYWORDS), "");
    }

    #[test]
    fn test_prompt_embeds_query() {
        let prompt = keyword_prompt("Hiring a Python analyst");
        assert!(prompt.ends_with("Query: Hiring a Python analyst"));
        assert!(prompt.contains("at most 10"));
    }

    #[tokio::test]
    async fn test_passthrough_returns_input() {
        let query = "Need a Java developer, 40 minutes max";
        assert_eq!(PassthroughShortener.shorten(query).await.unwrap(), query);
    }
}
