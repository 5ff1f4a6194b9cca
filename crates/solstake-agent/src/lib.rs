//! # solstake-agent
//!
//! Conversational staking for agent frameworks. A chat message is routed to
//! an action: the stake action extracts the amount and protocol with an LLM
//! prompt (or plain rules when no LLM is configured), then hands off to the
//! planner for an unsigned transaction and answers with a formatted reply.

pub mod actions;
pub mod intent;
pub mod llm;
pub mod message;
pub mod plugin;
pub mod prompts;

pub use actions::{
    Action, ActionError, ActionExample, ActionRequest, ActionResponse, PoolInfoAction,
    StakeAction, StakeOutcome,
};
pub use intent::{IntentParser, RuleBasedIntentParser, StakeIntent};
pub use llm::{extract_json_block, LlmClient, OpenAiCompatibleClient};
pub use message::{ChatMessage, Role};
pub use plugin::StakePlugin;
pub use prompts::PromptTemplates;
