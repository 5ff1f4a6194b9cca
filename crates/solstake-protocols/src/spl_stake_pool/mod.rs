//! Adapter for protocols built on the SPL Stake Pool program.
//!
//! Jito, BlazeStake, JPool and MarginFi all run a stock SPL stake pool, so a
//! single adapter covers them. The pool account is read on every call: it
//! carries the reserve and fee accounts needed for the deposit and the
//! lamport total that serves as TVL.

pub mod instruction;
pub mod state;

use crate::chain::ChainReader;
use crate::common::{
    MetricsRecorder, PoolMetrics, ProtocolError, ProtocolMetrics, StakeInstructions,
    StakeProtocol,
};
use crate::sanctum::SanctumClient;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solstake_lib::constants::{lst_mint, spl_pool_address, spl_stake_pool_program};
use solstake_lib::ProtocolId;
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub use state::StakePoolState;

/// Addresses that identify one SPL stake pool.
#[derive(Debug, Clone)]
pub struct SplPoolConfig {
    pub id: ProtocolId,
    pub program_id: Pubkey,
    pub pool: Pubkey,
    pub mint: Pubkey,
}

impl SplPoolConfig {
    /// Mainnet pool for `id`, `None` for protocols that are not SPL pools.
    pub fn mainnet(id: ProtocolId) -> Option<Self> {
        Some(Self {
            id,
            program_id: spl_stake_pool_program(),
            pool: spl_pool_address(id)?,
            mint: lst_mint(id),
        })
    }
}

pub struct SplStakePool {
    config: SplPoolConfig,
    chain: Arc<dyn ChainReader>,
    sanctum: SanctumClient,
    metrics: MetricsRecorder,
}

impl SplStakePool {
    pub fn new(config: SplPoolConfig, chain: Arc<dyn ChainReader>, sanctum: SanctumClient) -> Self {
        Self {
            config,
            chain,
            sanctum,
            metrics: MetricsRecorder::default(),
        }
    }

    pub fn config(&self) -> &SplPoolConfig {
        &self.config
    }

    /// Reads and decodes the pool account.
    pub async fn load_state(&self) -> Result<StakePoolState, ProtocolError> {
        let data = self.chain.account_data(&self.config.pool).await?;
        let state = StakePoolState::decode(&self.config.pool, &data)?;
        if state.pool_mint != self.config.mint {
            return Err(ProtocolError::specific(
                self.config.id,
                format!(
                    "pool {} mints {}, expected {}",
                    self.config.pool, state.pool_mint, self.config.mint
                ),
            ));
        }
        debug!(
            protocol = self.config.id.as_str(),
            total_lamports = state.total_lamports,
            pool_token_supply = state.pool_token_supply,
            epoch = state.last_update_epoch,
            "Loaded stake pool state"
        );
        Ok(state)
    }
}

#[async_trait]
impl StakeProtocol for SplStakePool {
    fn id(&self) -> ProtocolId {
        self.config.id
    }

    fn lst_mint(&self) -> Pubkey {
        self.config.mint
    }

    #[instrument(skip(self), fields(protocol = self.config.id.as_str()))]
    async fn fetch_metrics(&self) -> Result<PoolMetrics, ProtocolError> {
        self.metrics
            .measure(self.name(), "fetch_metrics", async {
                let state = self.load_state().await?;
                let apy = self.sanctum.fetch_apy(&self.config.mint).await?;
                Ok::<_, ProtocolError>(PoolMetrics {
                    protocol: self.config.id,
                    apy,
                    tvl_sol: state.tvl_sol(),
                    lst_mint: self.config.mint.to_string(),
                    fetched_at: chrono::Utc::now(),
                })
            })
            .await
    }

    #[instrument(skip(self), fields(protocol = self.config.id.as_str(), user = %user))]
    async fn build_stake_instructions(
        &self,
        user: &Pubkey,
        lamports: u64,
    ) -> Result<StakeInstructions, ProtocolError> {
        self.metrics
            .measure(self.name(), "build_stake_instructions", async {
                let state = self.load_state().await?;
                let user_pool_tokens = get_associated_token_address_with_program_id(
                    user,
                    &state.pool_mint,
                    &state.token_program_id,
                );

                let create_ata = create_associated_token_account_idempotent(
                    user,
                    user,
                    &state.pool_mint,
                    &state.token_program_id,
                );
                let deposit = instruction::deposit_sol(
                    &self.config.program_id,
                    &self.config.pool,
                    &state,
                    user,
                    &user_pool_tokens,
                    &user_pool_tokens,
                    lamports,
                );

                info!(
                    protocol = self.config.id.as_str(),
                    lamports,
                    expected_pool_tokens = (lamports as f64 / state.exchange_rate()) as u64,
                    "Built DepositSol instructions"
                );
                Ok::<_, ProtocolError>(StakeInstructions::Instructions(vec![
                    create_ata, deposit,
                ]))
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
