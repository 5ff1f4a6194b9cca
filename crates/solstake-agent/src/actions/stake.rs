use super::pool_info::pool_question;
use super::{Action, ActionError, ActionExample, ActionRequest, ActionResponse};
use crate::intent::{IntentParser, RuleBasedIntentParser};
use crate::prompts::PromptTemplates;
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use solstake_lib::constants::sol_to_lamports;
use solstake_lib::ProtocolId;
use solstake_protocols::{StakePlanner, StakeRequest};
use std::sync::{Arc, OnceLock};
use tracing::{info, instrument};

pub const STAKE_ACTION: &str = "STAKE_SOL";

/// Result of a successful stake request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeOutcome {
    pub protocol: ProtocolId,
    pub lamports: u64,
    /// bincode + base64 unsigned transaction for the wallet to sign
    pub transaction_base64: String,
    pub reply: String,
    pub apy: Option<f64>,
}

fn stake_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:re)?stak(?:e|es|ing)\b").expect("valid stake regex"))
}

fn sol_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:\b|\d)sol\b").expect("valid sol regex"))
}

/// Stakes SOL into a liquid staking pool.
pub struct StakeAction {
    planner: Arc<StakePlanner>,
    intent: Arc<IntentParser>,
    templates: Arc<PromptTemplates>,
}

impl StakeAction {
    pub fn new(
        planner: Arc<StakePlanner>,
        intent: Arc<IntentParser>,
        templates: Arc<PromptTemplates>,
    ) -> Self {
        Self {
            planner,
            intent,
            templates,
        }
    }

    /// Parses the request and prepares the unsigned transaction.
    #[instrument(skip(self, request), fields(wallet = %request.wallet))]
    pub async fn stake(&self, request: &ActionRequest) -> Result<StakeOutcome, ActionError> {
        let intent = self
            .intent
            .parse(&request.messages)
            .await
            .map_err(|e| ActionError::Intent(format!("{e:#}")))?;
        let amount_sol = intent.amount_sol.ok_or(ActionError::MissingAmount)?;
        let lamports = sol_to_lamports(amount_sol)?;

        let prepared = self
            .planner
            .prepare(&StakeRequest {
                user: request.wallet,
                lamports,
                protocol: intent.protocol,
            })
            .await?;

        let reply = self
            .templates
            .stake_reply(prepared.protocol, prepared.lamports, prepared.apy)
            .map_err(|e| ActionError::Reply(format!("{e:#}")))?;
        info!(protocol = %prepared.protocol, lamports, "Stake request ready for signing");

        Ok(StakeOutcome {
            protocol: prepared.protocol,
            lamports: prepared.lamports,
            transaction_base64: prepared.transaction_base64,
            reply,
            apy: prepared.apy,
        })
    }
}

#[async_trait]
impl Action for StakeAction {
    fn name(&self) -> &'static str {
        STAKE_ACTION
    }

    fn similes(&self) -> &'static [&'static str] {
        &[
            "STAKE",
            "LIQUID_STAKE",
            "STAKE_SOLANA",
            "DEPOSIT_SOL",
            "RESTAKE_SOL",
        ]
    }

    fn description(&self) -> &'static str {
        "Stake SOL with a liquid staking protocol (Marinade, Jito, BlazeStake, MarginFi, JPool or Solayer) and receive its liquid staking token. Picks the highest-APY pool when no protocol is named."
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        vec![
            vec![
                ActionExample::new("{{user1}}", "Stake 1 SOL with Marinade"),
                ActionExample::new(
                    "{{agent}}",
                    "Ready to stake 1 SOL with Marinade. You will receive mSOL.",
                ),
            ],
            vec![
                ActionExample::new("{{user1}}", "I want to liquid stake 5 SOL"),
                ActionExample::new(
                    "{{agent}}",
                    "Ready to stake 5 SOL with Jito at 7.90% APY. You will receive JitoSOL.",
                ),
            ],
            vec![
                ActionExample::new("{{user1}}", "restake 2.5 sol on solayer"),
                ActionExample::new(
                    "{{agent}}",
                    "Ready to stake 2.5 SOL with Solayer. You will receive sSOL.",
                ),
            ],
            vec![
                ActionExample::new("{{user1}}", "stake some SOL for me"),
                ActionExample::new(
                    "{{agent}}",
                    "Please tell me how much SOL you want to stake, for example \"stake 1.5 SOL\".",
                ),
            ],
        ]
    }

    /// Yield questions without an amount belong to the pool-info action.
    fn validate(&self, message: &str) -> bool {
        if pool_question().is_match(message) && RuleBasedIntentParser.amount(message).is_none() {
            return false;
        }
        stake_word().is_match(message)
            && (sol_word().is_match(message) || ProtocolId::find_in_text(message).is_some())
    }

    async fn handle(&self, request: &ActionRequest) -> Result<ActionResponse, ActionError> {
        let outcome = self.stake(request).await?;
        Ok(ActionResponse {
            action: STAKE_ACTION,
            text: outcome.reply.clone(),
            stake: Some(outcome),
        })
    }
}
