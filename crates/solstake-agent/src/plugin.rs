//! The staking plugin: a set of actions behind one router.

use crate::actions::{
    Action, ActionError, ActionRequest, ActionResponse, PoolInfoAction, StakeAction,
};
use crate::intent::IntentParser;
use crate::llm::LlmClient;
use crate::prompts::PromptTemplates;
use anyhow::Result;
use solstake_protocols::StakePlanner;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const PLUGIN_NAME: &str = "solstake";

pub struct StakePlugin {
    actions: Vec<Arc<dyn Action>>,
}

impl StakePlugin {
    pub fn new(actions: Vec<Arc<dyn Action>>) -> Self {
        Self { actions }
    }

    /// Stake and pool-info actions over `planner`. Intent parsing uses `llm`
    /// when given, rules otherwise.
    pub fn with_planner(planner: Arc<StakePlanner>, llm: Option<Arc<dyn LlmClient>>) -> Result<Self> {
        let templates = Arc::new(PromptTemplates::new()?);
        let intent = Arc::new(IntentParser::new(llm, templates.clone()));
        if !intent.has_llm() {
            info!("No LLM configured, stake intents are parsed with rules");
        }

        let pool_data = planner.pool_data().clone();
        let actions: Vec<Arc<dyn Action>> = vec![
            Arc::new(StakeAction::new(planner, intent, templates.clone())),
            Arc::new(PoolInfoAction::new(pool_data, templates)),
        ];
        Ok(Self::new(actions))
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    /// First action that accepts `message`, in registration order.
    pub fn route(&self, message: &str) -> Option<Arc<dyn Action>> {
        let action = self.actions.iter().find(|a| a.validate(message)).cloned();
        match &action {
            Some(a) => debug!(action = a.name(), "Routed message"),
            None => debug!("No action matched message"),
        }
        action
    }

    /// Routes the latest user message and runs the chosen action.
    #[instrument(skip(self, request), fields(wallet = %request.wallet))]
    pub async fn handle(&self, request: &ActionRequest) -> Result<ActionResponse, ActionError> {
        let action = self
            .route(request.latest_text())
            .ok_or(ActionError::NoMatchingAction)?;
        let response = action.handle(request).await;
        if let Err(e) = &response {
            warn!(action = action.name(), "Action failed: {}", e);
        }
        response
    }
}
