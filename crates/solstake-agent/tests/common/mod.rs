//! Offline fixtures: fixed-yield protocols, an in-memory chain and a scripted LLM.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use solana_system_interface::instruction as system_instruction;
use solstake_agent::LlmClient;
use solstake_lib::ProtocolId;
use solstake_protocols::{
    MemoryChain, PoolDataProvider, PoolMetrics, ProtocolError, ProtocolMetrics,
    ProtocolRegistry, RetryPolicy, StakeInstructions, StakePlanner, StakeProtocol,
};
use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub struct FixedYield {
    pub id: ProtocolId,
    pub apy: Option<f64>,
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
        let apy = self
            .apy
            .ok_or_else(|| ProtocolError::Network(format!("{} unreachable", self.id)))?;
        Ok(PoolMetrics {
            protocol: self.id,
            apy,
            tvl_sol: 1_000_000.0,
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

/// Planner over `protocols`, each given as (id, apy); `None` apy means the
/// protocol's metrics fetch fails.
pub fn planner(protocols: &[(ProtocolId, Option<f64>)], user: Pubkey, balance: u64) -> Arc<StakePlanner> {
    let protocols: Vec<Arc<dyn StakeProtocol>> = protocols
        .iter()
        .map(|&(id, apy)| Arc::new(FixedYield { id, apy }) as Arc<dyn StakeProtocol>)
        .collect();
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

/// Replies with a fixed answer, or fails when none is set.
pub struct ScriptedLlm {
    answer: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
            .clone()
            .ok_or_else(|| anyhow!("LLM API returned error: 503"))
    }
}
