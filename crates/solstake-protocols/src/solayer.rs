//! Solayer restaking.
//!
//! Solayer does not publish a deposit instruction layout. Its action API
//! returns a complete unsigned transaction for the requested amount, which is
//! passed through as-is.

use crate::chain::ChainReader;
use crate::common::{
    MetricsRecorder, PoolMetrics, ProtocolError, ProtocolMetrics, StakeInstructions,
    StakeProtocol,
};
use crate::http::send_json;
use crate::sanctum::SanctumClient;
use crate::transaction::decode_transaction;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use solstake_lib::constants::{lamports_to_sol, lst_mint};
use solstake_lib::ProtocolId;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct RestakeResponse {
    transaction: String,
    #[serde(default)]
    message: Option<String>,
}

pub struct SolayerProtocol {
    chain: Arc<dyn ChainReader>,
    sanctum: SanctumClient,
    client: reqwest::Client,
    api_url: String,
    mint: Pubkey,
    metrics: MetricsRecorder,
}

impl SolayerProtocol {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        sanctum: SanctumClient,
        client: reqwest::Client,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            chain,
            sanctum,
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            mint: lst_mint(ProtocolId::Solayer),
            metrics: MetricsRecorder::default(),
        }
    }

    async fn fetch_tvl(&self) -> Result<f64, ProtocolError> {
        let supply = self.chain.token_supply(&self.mint).await?;
        let sol_value = match self.sanctum.fetch_sol_value(&self.mint).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Falling back to 1:1 sSOL value: {}", e);
                1.0
            }
        };
        Ok(supply.ui_amount() * sol_value)
    }
}

#[async_trait]
impl StakeProtocol for SolayerProtocol {
    fn id(&self) -> ProtocolId {
        ProtocolId::Solayer
    }

    fn lst_mint(&self) -> Pubkey {
        self.mint
    }

    #[instrument(skip(self), fields(protocol = "solayer"))]
    async fn fetch_metrics(&self) -> Result<PoolMetrics, ProtocolError> {
        self.metrics
            .measure(self.name(), "fetch_metrics", async {
                let apy = self.sanctum.fetch_apy(&self.mint).await?;
                let tvl_sol = self.fetch_tvl().await?;
                Ok::<_, ProtocolError>(PoolMetrics {
                    protocol: ProtocolId::Solayer,
                    apy,
                    tvl_sol,
                    lst_mint: self.mint.to_string(),
                    fetched_at: chrono::Utc::now(),
                })
            })
            .await
    }

    #[instrument(skip(self), fields(protocol = "solayer", user = %user))]
    async fn build_stake_instructions(
        &self,
        user: &Pubkey,
        lamports: u64,
    ) -> Result<StakeInstructions, ProtocolError> {
        self.metrics
            .measure(self.name(), "build_stake_instructions", async {
                let amount = lamports_to_sol(lamports);
                let request = self
                    .client
                    .post(format!("{}/api/action/restake/ssol", self.api_url))
                    .query(&[("amount", amount.to_string())])
                    .json(&json!({ "account": user.to_string() }));
                let response: RestakeResponse = send_json(request).await?;

                if let Some(message) = &response.message {
                    info!("Solayer: {}", message);
                }

                let transaction = decode_transaction(&response.transaction)
                    .map_err(|e| ProtocolError::specific(ProtocolId::Solayer, e.to_string()))?;
                Ok::<_, ProtocolError>(StakeInstructions::Transaction(transaction))
            })
            .await
    }

    fn metrics(&self) -> ProtocolMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }
}
