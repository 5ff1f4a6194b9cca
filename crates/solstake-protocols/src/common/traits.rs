//! Protocol trait definitions

use super::{PoolMetrics, ProtocolError, ProtocolMetrics, StakeInstructions};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solstake_lib::ProtocolId;

/// A liquid-staking protocol that turns native SOL into an LST.
#[async_trait]
pub trait StakeProtocol: Send + Sync {
    fn id(&self) -> ProtocolId;

    /// Protocol name for identification
    fn name(&self) -> &'static str {
        self.id().as_str()
    }

    /// Mint of the liquid staking token the user receives
    fn lst_mint(&self) -> Pubkey;

    /// Current APY and TVL of the pool.
    async fn fetch_metrics(&self) -> Result<PoolMetrics, ProtocolError>;

    /// Builds what the user must sign to stake `lamports` from `user`.
    async fn build_stake_instructions(
        &self,
        user: &Pubkey,
        lamports: u64,
    ) -> Result<StakeInstructions, ProtocolError>;

    /// Request counters since creation or the last reset
    fn metrics(&self) -> ProtocolMetrics;

    fn reset_metrics(&self);
}
