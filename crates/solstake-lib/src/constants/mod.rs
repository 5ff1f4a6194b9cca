//! Constants module for centralized configuration values

pub mod addresses;
pub mod amounts;
pub mod env;

// Re-export commonly used constants for convenience
pub use addresses::{
    lst_mint, marinade, pools, spl_pool_address,
    programs::{marinade_program, spl_stake_pool_program, MARINADE_PROGRAM, SPL_STAKE_POOL_PROGRAM},
};
pub use amounts::{lamports_to_sol, sol_to_lamports, AmountError};
pub use amounts::{FEE_RESERVE_LAMPORTS, LAMPORTS_PER_SOL, MIN_STAKE_LAMPORTS};
