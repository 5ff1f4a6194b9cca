//! Conversational actions
//!
//! An action advertises itself to the host agent framework (name, similes,
//! description, example dialogues), decides whether a message is meant for
//! it, and handles it.

mod pool_info;
mod stake;

pub use pool_info::PoolInfoAction;
pub use stake::{StakeAction, StakeOutcome};

use crate::message::ChatMessage;
use async_trait::async_trait;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solstake_lib::constants::AmountError;
use solstake_lib::ProtocolId;
use solstake_protocols::{PoolDataError, ProtocolError, StakeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Please tell me how much SOL you want to stake, for example \"stake 1.5 SOL\".")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("The minimum stake is {minimum_sol} SOL, you asked for {requested_sol} SOL.")]
    AmountTooSmall { requested_sol: f64, minimum_sol: f64 },
    #[error("Insufficient balance: staking needs {required_sol} SOL including fees, your wallet holds {available_sol} SOL.")]
    InsufficientBalance { required_sol: f64, available_sol: f64 },
    #[error("{0} is not available right now.")]
    UnavailableProtocol(ProtocolId),
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("Pool data unavailable: {0}")]
    PoolData(#[from] PoolDataError),
    #[error("Failed to prepare the transaction: {0}")]
    Transaction(String),
    #[error("Failed to understand the request: {0}")]
    Intent(String),
    #[error("Failed to format the reply: {0}")]
    Reply(String),
    #[error("No action handles this message")]
    NoMatchingAction,
}

impl From<StakeError> for ActionError {
    fn from(err: StakeError) -> Self {
        use solstake_lib::constants::lamports_to_sol;
        match err {
            StakeError::AmountTooSmall { lamports, minimum } => ActionError::AmountTooSmall {
                requested_sol: lamports_to_sol(lamports),
                minimum_sol: lamports_to_sol(minimum),
            },
            StakeError::InsufficientBalance {
                required,
                available,
            } => ActionError::InsufficientBalance {
                required_sol: lamports_to_sol(required),
                available_sol: lamports_to_sol(available),
            },
            StakeError::UnavailableProtocol(id) => ActionError::UnavailableProtocol(id),
            StakeError::Protocol(e) => ActionError::Protocol(e),
            StakeError::Encoding(e) => ActionError::Transaction(e),
        }
    }
}

/// One turn of an example dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionExample {
    pub user: &'static str,
    pub text: &'static str,
}

impl ActionExample {
    pub const fn new(user: &'static str, text: &'static str) -> Self {
        Self { user, text }
    }
}

/// A message addressed to the agent by the owner of `wallet`.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub wallet: Pubkey,
    /// Conversation so far, oldest first. The last user message is the one
    /// being handled.
    pub messages: Vec<ChatMessage>,
}

impl ActionRequest {
    pub fn new(wallet: Pubkey, messages: Vec<ChatMessage>) -> Self {
        Self { wallet, messages }
    }

    pub fn latest_text(&self) -> &str {
        crate::message::latest_user_text(&self.messages).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub action: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake: Option<StakeOutcome>,
}

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    /// Alternative names the host may route by.
    fn similes(&self) -> &'static [&'static str];

    fn description(&self) -> &'static str;

    /// Example dialogues, each a sequence of turns.
    fn examples(&self) -> Vec<Vec<ActionExample>>;

    /// Whether `message` is meant for this action.
    fn validate(&self, message: &str) -> bool;

    async fn handle(&self, request: &ActionRequest) -> Result<ActionResponse, ActionError>;
}
