//! Prompt and reply templates
//!
//! All agent text goes through handlebars in strict mode, so a template that
//! references a field the caller did not supply fails instead of rendering
//! an empty string.

mod helpers;

use crate::message::ChatMessage;
use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde_json::json;
use solstake_lib::ProtocolId;
use solstake_protocols::PoolSnapshot;
use tracing::debug;

pub const STAKE_INTENT: &str = "stake_intent";
pub const STAKE_REPLY: &str = "stake_reply";
pub const POOL_REPLY: &str = "pool_reply";

/// System instruction sent with the intent prompt.
pub const INTENT_SYSTEM_PROMPT: &str =
    "You extract parameters for staking SOL from chat messages. Respond with valid JSON only.";

const STAKE_INTENT_TEMPLATE: &str = r#"Extract the staking request from the conversation below.

Supported protocols:
{{#each protocols}}- {{this.id}}: {{this.name}} (receives {{this.symbol}})
{{/each}}
Recent messages:
{{#each messages}}{{this.role}}: {{this.text}}
{{/each}}
Answer with a single JSON object and nothing else:
{"amount": <SOL amount as a number, or null>, "protocol": <one of the protocol ids above, or null>}

Rules:
- amount is in SOL, not lamports
- use null for anything the user did not state
- only the most recent request counts"#;

const STAKE_REPLY_TEMPLATE: &str = "Ready to stake {{sol lamports}} SOL with {{protocol_name}}\
{{#if has_apy}} at {{percent apy}} APY{{/if}}. You will receive {{lst_symbol}}.\n\
Sign the transaction below in your wallet to confirm.";

const POOL_REPLY_TEMPLATE: &str = "Current liquid staking pools:\n{{summary}}\
{{#if has_best}}\n\nHighest APY right now: {{best_name}} at {{percent best_apy}}.{{/if}}";

#[derive(Debug)]
pub struct PromptTemplates {
    handlebars: Handlebars<'static>,
}

impl PromptTemplates {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        helpers::register_all(&mut handlebars);
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, template) in [
            (STAKE_INTENT, STAKE_INTENT_TEMPLATE),
            (STAKE_REPLY, STAKE_REPLY_TEMPLATE),
            (POOL_REPLY, POOL_REPLY_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, template)
                .with_context(|| format!("Failed to compile template {name}"))?;
        }
        debug!("Prompt templates registered");

        Ok(Self { handlebars })
    }

    pub fn render(&self, name: &str, data: &serde_json::Value) -> Result<String> {
        self.handlebars
            .render(name, data)
            .with_context(|| format!("Failed to render template {name}"))
    }

    pub fn stake_intent(&self, messages: &[ChatMessage]) -> Result<String> {
        let protocols: Vec<_> = ProtocolId::ALL
            .iter()
            .map(|p| {
                json!({
                    "id": p.as_str(),
                    "name": p.display_name(),
                    "symbol": p.lst_symbol(),
                })
            })
            .collect();
        self.render(
            STAKE_INTENT,
            &json!({ "protocols": protocols, "messages": messages }),
        )
    }

    pub fn stake_reply(&self, protocol: ProtocolId, lamports: u64, apy: Option<f64>) -> Result<String> {
        self.render(
            STAKE_REPLY,
            &json!({
                "lamports": lamports,
                "protocol_name": protocol.display_name(),
                "lst_symbol": protocol.lst_symbol(),
                "has_apy": apy.is_some(),
                "apy": apy.unwrap_or_default(),
            }),
        )
    }

    pub fn pool_reply(&self, snapshot: &PoolSnapshot) -> Result<String> {
        let best = snapshot.best_by_apy();
        self.render(
            POOL_REPLY,
            &json!({
                "summary": solstake_protocols::format_pool_summary(snapshot),
                "has_best": best.is_some(),
                "best_name": best.map(|b| b.protocol.display_name()).unwrap_or_default(),
                "best_apy": best.map(|b| b.apy).unwrap_or_default(),
            }),
        )
    }
}
