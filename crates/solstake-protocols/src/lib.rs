//! # solstake-protocols
//!
//! Liquid-staking protocol adapters and the pool-data provider.
//!
//! Each adapter implements [`StakeProtocol`]: it can report the pool's APY and
//! TVL and it can build the instructions (or a pre-built transaction) that
//! deposit native SOL in exchange for the protocol's liquid staking token.
//! [`PoolDataProvider`] aggregates those metrics across protocols with a fixed
//! retry loop and a single-slot TTL cache. [`StakePlanner`] ties both together
//! into an unsigned transaction for the user's wallet.

pub mod chain;
pub mod common;
pub mod http;
pub mod marinade;
pub mod planner;
pub mod pool_data;
pub mod registry;
pub mod sanctum;
pub mod solayer;
pub mod spl_stake_pool;
pub mod transaction;

pub use chain::{ChainReader, MemoryChain, TokenSupply};
pub use common::{
    PoolMetrics, ProtocolError, ProtocolMetrics, StakeInstructions, StakeProtocol,
};
pub use pool_data::{
    format_pool_summary, PoolDataError, PoolDataProvider, PoolSnapshot, RetryPolicy,
};
pub use planner::{PreparedStake, StakeError, StakePlanner, StakeRequest, FALLBACK_PROTOCOL};
pub use registry::{Endpoints, ProtocolRegistry};
pub use transaction::{build_unsigned_transaction, decode_transaction, encode_transaction};
