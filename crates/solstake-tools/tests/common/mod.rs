//! Fixed-yield protocols for exercising the tools without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use solana_system_interface::instruction as system_instruction;
use solstake_lib::ProtocolId;
use solstake_protocols::{
    MemoryChain, PoolDataProvider, PoolMetrics, ProtocolError, ProtocolMetrics,
    ProtocolRegistry, RetryPolicy, StakeInstructions, StakePlanner, StakeProtocol,
};
use std::sync::Arc;
use std::time::Duration;

pub struct FixedYield {
    pub id: ProtocolId,
    pub apy: f64,
}

#[async_trait]
impl StakeProtocol for FixedYield {
    fn id(&self) -> ProtocolId {
        self.id
    }

    fn lst_mint(&self) -> Pubkey {
        solstake_lib::constants::lst_mint(self.id)
    }

    async fn fetch_metrics(&self) -> Result<PoolMetrics, ProtocolError> {
        Ok(PoolMetrics {
            protocol: self.id,
            apy: self.apy,
            tvl_sol: 250_000.0,
            lst_mint: self.lst_mint().to_string(),
            fetched_at: chrono::Utc::now(),
        })
    }

    async fn build_stake_instructions(
        &self,
        user: &Pubkey,
        lamports: u64,
    ) -> Result<StakeInstructions, ProtocolError> {
        Ok(StakeInstructions::Instructions(vec![system_instruction::transfer(
            user,
            &self.lst_mint(),
            lamports,
        )]))
    }

    fn metrics(&self) -> ProtocolMetrics {
        ProtocolMetrics::default()
    }

    fn reset_metrics(&self) {}
}

/// Marinade at 6.8% and Jito at 7.9%, with `user` holding `balance` lamports.
pub fn planner(user: Pubkey, balance: u64) -> Arc<StakePlanner> {
    let protocols: Vec<Arc<dyn StakeProtocol>> = vec![
        Arc::new(FixedYield {
            id: ProtocolId::Marinade,
            apy: 0.068,
        }),
        Arc::new(FixedYield {
            id: ProtocolId::Jito,
            apy: 0.079,
        }),
    ];
    let chain = MemoryChain::new()
        .with_balance(user, balance)
        .with_blockhash(Hash::new_unique());
    let pool_data = PoolDataProvider::new(
        protocols.clone(),
        Duration::from_secs(60),
        RetryPolicy::new(1, Duration::ZERO),
    );
    Arc::new(StakePlanner::new(
        Arc::new(ProtocolRegistry::new(protocols)),
        Arc::new(pool_data),
        Arc::new(chain),
    ))
}
