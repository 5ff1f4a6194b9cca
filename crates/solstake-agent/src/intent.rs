//! Stake intent extraction
//!
//! Turns free-form chat into an amount and an optional protocol. The LLM path
//! renders the `stake_intent` prompt and reads back a JSON object; the rule
//! path matches `<number> SOL` and protocol names directly.

use crate::llm::{extract_json_block, LlmClient};
use crate::message::{ChatMessage, Role};
use crate::prompts::{PromptTemplates, INTENT_SYSTEM_PROMPT};
use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use solstake_lib::ProtocolId;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument, warn};

/// Only this many trailing messages are shown to the LLM.
const MAX_CONTEXT_MESSAGES: usize = 6;

/// What the user asked to stake. Either field may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StakeIntent {
    pub amount_sol: Option<f64>,
    pub protocol: Option<ProtocolId>,
}

/// LLMs return amounts as numbers or as strings like "1.5 SOL".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    amount: Option<RawAmount>,
    #[serde(default)]
    protocol: Option<String>,
}

impl RawIntent {
    fn validate(self) -> StakeIntent {
        let amount_sol = match self.amount {
            Some(RawAmount::Number(n)) => Some(n),
            Some(RawAmount::Text(text)) => parse_amount_text(&text),
            None => None,
        }
        .filter(|n| n.is_finite() && *n > 0.0);

        let protocol = self
            .protocol
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("null"))
            .and_then(|p| match p.parse::<ProtocolId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Ignoring protocol from LLM: {}", e);
                    None
                }
            });

        StakeIntent {
            amount_sol,
            protocol,
        }
    }
}

fn parse_amount_text(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches(|c: char| c.is_ascii_alphabetic() || c.is_whitespace());
    match trimmed.replace(',', "").parse::<f64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("Ignoring unparseable amount from LLM: {:?}", text);
            None
        }
    }
}

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)\s*sol\b")
            .expect("valid amount regex")
    })
}

/// Regex and keyword extraction, used without an LLM.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedIntentParser;

impl RuleBasedIntentParser {
    /// Amount and protocol from the most recent user message that mentions
    /// them, searching backwards.
    pub fn parse(&self, messages: &[ChatMessage]) -> StakeIntent {
        let user_texts: Vec<&str> = messages
            .iter()
            .rev()
            .filter(|m| m.role == Role::User)
            .map(|m| m.text.as_str())
            .collect();

        let amount_sol = user_texts.iter().find_map(|text| self.amount(text));
        let protocol = user_texts.iter().find_map(|text| ProtocolId::find_in_text(text));
        StakeIntent {
            amount_sol,
            protocol,
        }
    }

    /// First `<number> SOL` in `text`.
    pub fn amount(&self, text: &str) -> Option<f64> {
        amount_regex()
            .captures_iter(text)
            .filter_map(|c| c[1].replace(',', "").parse::<f64>().ok())
            .find(|n| *n > 0.0)
    }
}

pub struct IntentParser {
    llm: Option<Arc<dyn LlmClient>>,
    templates: Arc<PromptTemplates>,
    rules: RuleBasedIntentParser,
}

impl IntentParser {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, templates: Arc<PromptTemplates>) -> Self {
        Self {
            llm,
            templates,
            rules: RuleBasedIntentParser,
        }
    }

    pub fn rule_based(templates: Arc<PromptTemplates>) -> Self {
        Self::new(None, templates)
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Extracts the stake intent from the conversation.
    ///
    /// LLM failures fall back to the rules; only an unrenderable prompt is
    /// an error.
    #[instrument(skip(self, messages), fields(messages = messages.len(), llm = self.has_llm()))]
    pub async fn parse(&self, messages: &[ChatMessage]) -> Result<StakeIntent> {
        let Some(llm) = &self.llm else {
            let intent = self.rules.parse(messages);
            debug!(?intent, "Parsed intent with rules");
            return Ok(intent);
        };

        let recent = &messages[messages.len().saturating_sub(MAX_CONTEXT_MESSAGES)..];
        let prompt = self.templates.stake_intent(recent)?;

        match self.parse_with_llm(llm.as_ref(), &prompt).await {
            Ok(intent) => {
                info!(?intent, "Parsed intent with LLM");
                Ok(intent)
            }
            Err(e) => {
                warn!("LLM intent extraction failed, using rules: {:#}", e);
                Ok(self.rules.parse(messages))
            }
        }
    }

    async fn parse_with_llm(&self, llm: &dyn LlmClient, prompt: &str) -> Result<StakeIntent> {
        let answer = llm.complete(INTENT_SYSTEM_PROMPT, prompt).await?;
        let json = extract_json_block(&answer)
            .ok_or_else(|| anyhow!("No JSON object in LLM answer: {answer}"))?;
        let raw: RawIntent = serde_json::from_str(json)
            .map_err(|e| anyhow!("Malformed intent JSON {json}: {e}"))?;
        Ok(raw.validate())
    }
}
