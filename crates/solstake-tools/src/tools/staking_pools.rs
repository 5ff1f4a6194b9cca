//! Staking pools discovery tool
//!
//! Gives the LLM current APY and TVL of every supported pool so it can
//! answer yield questions or recommend where to stake.

use crate::tool_names::GET_STAKING_POOLS;
use rig::{completion::ToolDefinition, tool::Tool};
use serde::{Deserialize, Serialize};
use serde_json::json;
use solstake_lib::UnknownProtocol;
use solstake_protocols::{PoolDataError, PoolDataProvider};
use std::{sync::Arc, time::Instant};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Deserialize, Debug, Serialize)]
pub struct StakingPoolsArgs {
    /// Optional: only report this protocol
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Error)]
pub enum StakingPoolsError {
    #[error(transparent)]
    UnknownProtocol(#[from] UnknownProtocol),
    #[error("Pool data unavailable: {0}")]
    PoolData(#[from] PoolDataError),
    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct StakingPoolsTool {
    pool_data: Arc<PoolDataProvider>,
}

impl StakingPoolsTool {
    pub fn new(pool_data: Arc<PoolDataProvider>) -> Self {
        Self { pool_data }
    }
}

impl Tool for StakingPoolsTool {
    const NAME: &'static str = GET_STAKING_POOLS;
    type Error = StakingPoolsError;
    type Args = StakingPoolsArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List Solana liquid staking pools (Marinade, Jito, BlazeStake, MarginFi, JPool, Solayer) with their current APY and total value locked. APY values are fractions: 0.07 means 7%. Protocols that could not be reached are listed under `failures`.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "protocol": {
                        "type": "string",
                        "description": "Optional: only return this protocol (e.g. 'jito', 'marinade')"
                    }
                }
            }),
        }
    }

    #[instrument(
        name = "staking_pools_tool_call",
        skip(self),
        fields(tool_name = GET_STAKING_POOLS, protocol = ?args.protocol)
    )]
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let start_time = Instant::now();
        let protocol = super::parse_protocol(args.protocol.as_deref())?;

        let snapshot = self.pool_data.get_pool_data().await?;
        let snapshot = match protocol {
            Some(id) => snapshot.filtered(id),
            None => snapshot,
        };

        info!(
            "[StakingPoolsTool] Completed in {}ms - pools: {}, failures: {}",
            start_time.elapsed().as_millis(),
            snapshot.pools.len(),
            snapshot.failures.len()
        );
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}
