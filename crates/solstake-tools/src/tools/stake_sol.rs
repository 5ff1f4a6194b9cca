//! Stake SOL tool
//!
//! Builds an unsigned liquid-staking transaction for the user's wallet. The
//! tool never signs: its output carries the base64 transaction for the wallet.

use crate::tool_names::STAKE_SOL;
use rig::{completion::ToolDefinition, tool::Tool};
use serde::{Deserialize, Serialize};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use solstake_lib::constants::{sol_to_lamports, AmountError};
use solstake_lib::{ProtocolId, UnknownProtocol};
use solstake_protocols::{StakeError, StakePlanner, StakeRequest};
use std::{str::FromStr, sync::Arc, time::Instant};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// The arguments for the stake tool, which will be provided by the AI model.
#[derive(Deserialize, Debug, Serialize)]
pub struct StakeSolArgs {
    pub user_pubkey: String,
    pub amount_sol: f64,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Error)]
pub enum StakeSolError {
    #[error("Failed to parse pubkey: {0}")]
    PubkeyParse(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error(transparent)]
    UnknownProtocol(#[from] UnknownProtocol),
    #[error("Stake failed: {0}")]
    Stake(#[from] StakeError),
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A `rig` tool that prepares a liquid-staking deposit.
pub struct StakeSolTool {
    planner: Arc<StakePlanner>,
}

impl StakeSolTool {
    pub fn new(planner: Arc<StakePlanner>) -> Self {
        Self { planner }
    }

    fn request(args: &StakeSolArgs) -> Result<StakeRequest, StakeSolError> {
        let user = Pubkey::from_str(args.user_pubkey.trim())
            .map_err(|e| StakeSolError::PubkeyParse(format!("{}: {e}", args.user_pubkey)))?;
        let lamports = sol_to_lamports(args.amount_sol)?;
        let protocol = super::parse_protocol(args.protocol.as_deref())?;
        Ok(StakeRequest {
            user,
            lamports,
            protocol,
        })
    }
}

impl Tool for StakeSolTool {
    const NAME: &'static str = STAKE_SOL;
    type Error = StakeSolError;
    type Args = StakeSolArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        let protocols: Vec<&str> = ProtocolId::ALL.iter().map(|p| p.as_str()).collect();
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Stake native SOL into a liquid staking pool and receive its liquid staking token (mSOL, JitoSOL, bSOL, LST, JSOL or sSOL). Returns an UNSIGNED base64 transaction for the user's wallet to sign. When the user names no protocol, leave `protocol` empty and the pool with the highest APY is chosen.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "user_pubkey": {
                        "type": "string",
                        "description": "The public key of the wallet that stakes and signs."
                    },
                    "amount_sol": {
                        "type": "number",
                        "description": "Amount of SOL to stake, in SOL (not lamports). Example: 1.5"
                    },
                    "protocol": {
                        "type": "string",
                        "enum": protocols,
                        "description": "Optional staking protocol. Omit to use the highest-APY pool."
                    }
                },
                "required": ["user_pubkey", "amount_sol"],
            }),
        }
    }

    #[instrument(
        name = "stake_sol_tool_call",
        skip(self),
        fields(
            tool_name = STAKE_SOL,
            user_pubkey = %args.user_pubkey,
            amount_sol = args.amount_sol,
            protocol = ?args.protocol
        )
    )]
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let start_time = Instant::now();
        debug!("StakeSolTool called with {:?}", args);

        let result = async {
            let request = Self::request(&args)?;
            let prepared = self.planner.prepare(&request).await?;
            Ok::<_, StakeSolError>(serde_json::to_string(&prepared)?)
        }
        .await;

        let execution_time = start_time.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!("[StakeSolTool] Completed in {}ms", execution_time),
            Err(e) => error!("[StakeSolTool] Failed in {}ms: {}", execution_time, e),
        }
        result
    }
}
