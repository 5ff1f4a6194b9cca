//! LLM access for intent extraction.

mod openai;

pub use openai::OpenAiCompatibleClient;

use anyhow::Result;
use async_trait::async_trait;

/// A chat-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Completes `prompt` under the `system` instruction and returns the raw text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Outermost `{...}` span of an LLM answer.
///
/// Models wrap JSON in code fences or prose; everything before the first `{`
/// and after the last `}` is dropped.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"amount": 1}"#, Some(r#"{"amount": 1}"#))]
    #[case("```json\n{\"amount\": 2.5}\n```", Some("{\"amount\": 2.5}"))]
    #[case(
        r#"Sure! Here it is: {"amount": null, "protocol": {"id": "jito"}} Hope that helps."#,
        Some(r#"{"amount": null, "protocol": {"id": "jito"}}"#)
    )]
    #[case("no json here", None)]
    #[case("} backwards {", None)]
    fn extracts_outermost_object(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_json_block(input), expected);
    }
}
