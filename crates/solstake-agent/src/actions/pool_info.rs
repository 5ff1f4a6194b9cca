use super::{Action, ActionError, ActionExample, ActionRequest, ActionResponse};
use crate::prompts::PromptTemplates;
use async_trait::async_trait;
use regex::Regex;
use solstake_lib::ProtocolId;
use solstake_protocols::PoolDataProvider;
use std::sync::{Arc, OnceLock};
use tracing::instrument;

pub const POOL_INFO_ACTION: &str = "STAKING_POOLS";

pub(super) fn pool_question() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:apy|apr|yields?|staking\s+(?:rates?|pools?|options)|tvl)\b")
            .expect("valid pool question regex")
    })
}

/// Answers questions about staking yields with the aggregated pool table.
pub struct PoolInfoAction {
    pool_data: Arc<PoolDataProvider>,
    templates: Arc<PromptTemplates>,
}

impl PoolInfoAction {
    pub fn new(pool_data: Arc<PoolDataProvider>, templates: Arc<PromptTemplates>) -> Self {
        Self {
            pool_data,
            templates,
        }
    }
}

#[async_trait]
impl Action for PoolInfoAction {
    fn name(&self) -> &'static str {
        POOL_INFO_ACTION
    }

    fn similes(&self) -> &'static [&'static str] {
        &["STAKING_APY", "STAKING_YIELDS", "LST_POOLS", "COMPARE_STAKING"]
    }

    fn description(&self) -> &'static str {
        "Report the current APY and TVL of the supported Solana liquid staking pools."
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        vec![
            vec![
                ActionExample::new("{{user1}}", "What are the current staking yields?"),
                ActionExample::new(
                    "{{agent}}",
                    "Current liquid staking pools:\n- Jito (JitoSOL): 7.90% APY, 14.20M SOL TVL\n- Marinade (mSOL): 7.10% APY, 6.50M SOL TVL",
                ),
            ],
            vec![
                ActionExample::new("{{user1}}", "what's jito's apy?"),
                ActionExample::new(
                    "{{agent}}",
                    "Current liquid staking pools:\n- Jito (JitoSOL): 7.90% APY, 14.20M SOL TVL",
                ),
            ],
        ]
    }

    fn validate(&self, message: &str) -> bool {
        pool_question().is_match(message)
    }

    #[instrument(skip(self, request))]
    async fn handle(&self, request: &ActionRequest) -> Result<ActionResponse, ActionError> {
        let snapshot = self.pool_data.get_pool_data().await?;
        let snapshot = match ProtocolId::find_in_text(request.latest_text()) {
            Some(id) if snapshot.get(id).is_some() => snapshot.filtered(id),
            _ => snapshot,
        };

        let text = self
            .templates
            .pool_reply(&snapshot)
            .map_err(|e| ActionError::Reply(format!("{e:#}")))?;
        Ok(ActionResponse {
            action: POOL_INFO_ACTION,
            text,
            stake: None,
        })
    }
}
