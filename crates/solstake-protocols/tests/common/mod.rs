//! Scripted protocol shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::instruction as system_instruction;
use solstake_lib::ProtocolId;
use solstake_protocols::{
    PoolMetrics, ProtocolError, ProtocolMetrics, StakeInstructions, StakeProtocol,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns fixed metrics after failing the first `failures_before_success` calls.
pub struct ScriptedProtocol {
    id: ProtocolId,
    apy: f64,
    failures_before_success: usize,
    calls: AtomicUsize,
}

impl ScriptedProtocol {
    pub fn healthy(id: ProtocolId, apy: f64) -> Arc<Self> {
        Self::flaky(id, apy, 0)
    }

    pub fn flaky(id: ProtocolId, apy: f64, failures_before_success: usize) -> Arc<Self> {
        Arc::new(Self {
            id,
            apy,
            failures_before_success,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn broken(id: ProtocolId) -> Arc<Self> {
        Self::flaky(id, 0.0, usize::MAX)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StakeProtocol for ScriptedProtocol {
    fn id(&self) -> ProtocolId {
        self.id
    }

    fn lst_mint(&self) -> Pubkey {
        solstake_lib::constants::lst_mint(self.id)
    }

    async fn fetch_metrics(&self) -> Result<PoolMetrics, ProtocolError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            return Err(ProtocolError::Network(format!("{} is down", self.id)));
        }
        Ok(PoolMetrics {
            protocol: self.id,
            apy: self.apy,
            tvl_sol: 1_000.0,
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
            &vault(self.id),
            lamports,
        )]))
    }

    fn metrics(&self) -> ProtocolMetrics {
        ProtocolMetrics::default()
    }

    fn reset_metrics(&self) {}
}

/// Deterministic deposit target for a scripted protocol.
pub fn vault(id: ProtocolId) -> Pubkey {
    Pubkey::new_from_array([id as u8 + 1; 32])
}
