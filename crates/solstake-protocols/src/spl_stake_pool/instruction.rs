//! `DepositSol` instruction of the SPL Stake Pool program.

use super::state::StakePoolState;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Variant index of `DepositSol` in the program's instruction enum.
const DEPOSIT_SOL_TAG: u8 = 14;

/// PDA that owns pool stake accounts and mints pool tokens.
pub fn find_withdraw_authority(program_id: &Pubkey, stake_pool: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[stake_pool.as_ref(), b"withdraw"], program_id).0
}

pub fn deposit_sol_data(lamports: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(9);
    data.push(DEPOSIT_SOL_TAG);
    data.extend_from_slice(&lamports.to_le_bytes());
    data
}

/// Deposits `lamports` from `depositor` into the pool, minting pool tokens to
/// `pool_tokens_to`. Referral fees go to `referrer`.
pub fn deposit_sol(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    state: &StakePoolState,
    depositor: &Pubkey,
    pool_tokens_to: &Pubkey,
    referrer: &Pubkey,
    lamports: u64,
) -> Instruction {
    let withdraw_authority = find_withdraw_authority(program_id, stake_pool);
    let accounts = vec![
        AccountMeta::new(*stake_pool, false),
        AccountMeta::new_readonly(withdraw_authority, false),
        AccountMeta::new(state.reserve_stake, false),
        AccountMeta::new(*depositor, true),
        AccountMeta::new(*pool_tokens_to, false),
        AccountMeta::new(state.manager_fee_account, false),
        AccountMeta::new(*referrer, false),
        AccountMeta::new(state.pool_mint, false),
        AccountMeta::new_readonly(solana_system_interface::program::ID, false),
        AccountMeta::new_readonly(state.token_program_id, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data: deposit_sol_data(lamports),
    }
}
