//! Sanctum API client for LST yields and SOL values.
//!
//! Sanctum publishes the trailing APY and the current SOL value of every
//! major liquid staking token, which gives all adapters a single yield source.

use crate::common::ProtocolError;
use crate::http::send_json;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct ApyResponse {
    apys: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolValueResponse {
    sol_values: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct SanctumClient {
    client: reqwest::Client,
    base_url: String,
}

impl SanctumClient {
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Latest APY of `mint` as a fraction.
    #[instrument(skip(self), fields(mint = %mint))]
    pub async fn fetch_apy(&self, mint: &Pubkey) -> Result<f64, ProtocolError> {
        let mint = mint.to_string();
        let request = self
            .client
            .get(format!("{}/v1/apy/latest", self.base_url))
            .query(&[("lst", mint.as_str())]);
        let response: ApyResponse = send_json(request).await?;

        response
            .apys
            .get(&mint)
            .copied()
            .ok_or_else(|| ProtocolError::ProtocolSpecific {
                protocol: "sanctum".to_string(),
                message: format!("no APY reported for {mint}"),
            })
    }

    /// SOL redeemable for one whole LST token.
    #[instrument(skip(self), fields(mint = %mint))]
    pub async fn fetch_sol_value(&self, mint: &Pubkey) -> Result<f64, ProtocolError> {
        let mint = mint.to_string();
        let request = self
            .client
            .get(format!("{}/v1/sol-value/current", self.base_url))
            .query(&[("lst", mint.as_str())]);
        let response: SolValueResponse = send_json(request).await?;

        let lamports = response
            .sol_values
            .get(&mint)
            .ok_or_else(|| ProtocolError::ProtocolSpecific {
                protocol: "sanctum".to_string(),
                message: format!("no SOL value reported for {mint}"),
            })?;
        let lamports = lamports
            .parse::<u64>()
            .map_err(|e| ProtocolError::ProtocolSpecific {
                protocol: "sanctum".to_string(),
                message: format!("bad SOL value {lamports} for {mint}: {e}"),
            })?;
        Ok(solstake_lib::constants::lamports_to_sol(lamports))
    }
}
