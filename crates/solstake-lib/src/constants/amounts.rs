//! SOL amount constants and lamport conversions

use thiserror::Error;

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Smallest stake accepted by the actions (0.001 SOL)
pub const MIN_STAKE_LAMPORTS: u64 = 1_000_000;

/// Kept back from the wallet balance for fees and LST account rent (0.01 SOL)
pub const FEE_RESERVE_LAMPORTS: u64 = 10_000_000;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AmountError {
    #[error("Amount must be a finite number, got {0}")]
    NotFinite(f64),
    #[error("Amount must be greater than 0, got {0}")]
    NotPositive(f64),
    #[error("Amount {0} SOL is too large")]
    Overflow(f64),
}

/// Converts a SOL amount to lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(sol: f64) -> Result<u64, AmountError> {
    if !sol.is_finite() {
        return Err(AmountError::NotFinite(sol));
    }
    if sol <= 0.0 {
        return Err(AmountError::NotPositive(sol));
    }

    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if lamports >= u64::MAX as f64 {
        return Err(AmountError::Overflow(sol));
    }
    if lamports < 1.0 {
        return Err(AmountError::NotPositive(sol));
    }
    Ok(lamports as u64)
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
