//! Marinade liquid staking.
//!
//! Deposits call the Anchor `deposit` instruction of the Marinade program
//! directly. All PDAs hang off the Marinade state account.

use crate::common::{
    MetricsRecorder, PoolMetrics, ProtocolError, ProtocolMetrics, StakeInstructions,
    StakeProtocol,
};
use crate::http::send_json;
use crate::sanctum::SanctumClient;
use async_trait::async_trait;
use serde::Deserialize;
use solana_sdk::{
    hash::hashv,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use solstake_lib::constants::{marinade, marinade_program};
use solstake_lib::ProtocolId;
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use tracing::{info, instrument};

/// Anchor discriminator: first 8 bytes of sha256("global:<name>").
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let hash = hashv(&[format!("global:{name}").as_bytes()]);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash.to_bytes()[..8]);
    discriminator
}

/// Accounts of one Marinade deployment.
#[derive(Debug, Clone)]
pub struct MarinadeAccounts {
    pub program_id: Pubkey,
    pub state: Pubkey,
    pub msol_mint: Pubkey,
    pub liq_pool_msol_leg: Pubkey,
}

impl MarinadeAccounts {
    pub fn mainnet() -> Self {
        Self {
            program_id: marinade_program(),
            state: marinade::state(),
            msol_mint: marinade::msol_mint(),
            liq_pool_msol_leg: marinade::liq_pool_msol_leg(),
        }
    }

    fn pda(&self, seed: &[u8]) -> Pubkey {
        Pubkey::find_program_address(&[self.state.as_ref(), seed], &self.program_id).0
    }

    pub fn reserve(&self) -> Pubkey {
        self.pda(b"reserve")
    }

    pub fn msol_mint_authority(&self) -> Pubkey {
        self.pda(b"st_mint")
    }

    pub fn liq_pool_sol_leg(&self) -> Pubkey {
        self.pda(b"liq_sol")
    }

    pub fn liq_pool_msol_leg_authority(&self) -> Pubkey {
        self.pda(b"liq_st_sol_authority")
    }
}

/// `deposit(lamports)` moving SOL from `user` and minting mSOL to `mint_to`.
pub fn deposit_instruction(
    accounts: &MarinadeAccounts,
    user: &Pubkey,
    mint_to: &Pubkey,
    lamports: u64,
) -> Instruction {
    let mut data = anchor_discriminator("deposit").to_vec();
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: accounts.program_id,
        accounts: vec![
            AccountMeta::new(accounts.state, false),
            AccountMeta::new(accounts.msol_mint, false),
            AccountMeta::new(accounts.liq_pool_sol_leg(), false),
            AccountMeta::new(accounts.liq_pool_msol_leg, false),
            AccountMeta::new_readonly(accounts.liq_pool_msol_leg_authority(), false),
            AccountMeta::new(accounts.reserve(), false),
            AccountMeta::new(*user, true),
            AccountMeta::new(*mint_to, false),
            AccountMeta::new_readonly(accounts.msol_mint_authority(), false),
            AccountMeta::new_readonly(solana_system_interface::program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ],
        data,
    }
}

#[derive(Debug, Deserialize)]
struct TlvResponse {
    total_sol: Option<f64>,
    staked_sol: Option<f64>,
}

pub struct MarinadeProtocol {
    accounts: MarinadeAccounts,
    sanctum: SanctumClient,
    client: reqwest::Client,
    api_url: String,
    metrics: MetricsRecorder,
}

impl MarinadeProtocol {
    pub fn new(
        accounts: MarinadeAccounts,
        sanctum: SanctumClient,
        client: reqwest::Client,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            accounts,
            sanctum,
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            metrics: MetricsRecorder::default(),
        }
    }

    /// Total SOL managed by Marinade, from its public API.
    pub async fn fetch_tvl(&self) -> Result<f64, ProtocolError> {
        let request = self.client.get(format!("{}/tlv", self.api_url));
        let response: TlvResponse = send_json(request).await?;
        response
            .total_sol
            .or(response.staked_sol)
            .ok_or_else(|| ProtocolError::specific(ProtocolId::Marinade, "TVL missing from /tlv"))
    }
}

#[async_trait]
impl StakeProtocol for MarinadeProtocol {
    fn id(&self) -> ProtocolId {
        ProtocolId::Marinade
    }

    fn lst_mint(&self) -> Pubkey {
        self.accounts.msol_mint
    }

    #[instrument(skip(self), fields(protocol = "marinade"))]
    async fn fetch_metrics(&self) -> Result<PoolMetrics, ProtocolError> {
        self.metrics
            .measure(self.name(), "fetch_metrics", async {
                let apy = self.sanctum.fetch_apy(&self.accounts.msol_mint).await?;
                let tvl_sol = self.fetch_tvl().await?;
                Ok::<_, ProtocolError>(PoolMetrics {
                    protocol: ProtocolId::Marinade,
                    apy,
                    tvl_sol,
                    lst_mint: self.accounts.msol_mint.to_string(),
                    fetched_at: chrono::Utc::now(),
                })
            })
            .await
    }

    #[instrument(skip(self), fields(protocol = "marinade", user = %user))]
    async fn build_stake_instructions(
        &self,
        user: &Pubkey,
        lamports: u64,
    ) -> Result<StakeInstructions, ProtocolError> {
        let msol_account = get_associated_token_address(user, &self.accounts.msol_mint);
        let create_ata = create_associated_token_account_idempotent(
            user,
            user,
            &self.accounts.msol_mint,
            &spl_token::ID,
        );
        let deposit = deposit_instruction(&self.accounts, user, &msol_account, lamports);
        info!(lamports, msol_account = %msol_account, "Built Marinade deposit instructions");

        self.metrics
            .measure(self.name(), "build_stake_instructions", async {
                Ok::<_, ProtocolError>(StakeInstructions::Instructions(vec![create_ata, deposit]))
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
