//! Tool name constants
//!
//! Shared with the agent and the CLI so tool names are never hardcoded twice.

/// Stake native SOL into a liquid staking pool
pub const STAKE_SOL: &str = "stake_sol";

/// List staking pools with APY and TVL
pub const GET_STAKING_POOLS: &str = "get_staking_pools";

pub const ALL: [&str; 2] = [STAKE_SOL, GET_STAKING_POOLS];
