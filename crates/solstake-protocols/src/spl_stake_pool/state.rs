//! Decoder for the fixed-size head of an SPL stake pool account.
//!
//! The account is borsh-encoded. Everything up to `last_update_epoch` has a
//! fixed width, which covers all fields needed for deposits and TVL. Fields
//! after it (fees, optional authorities) are not read.

use crate::common::ProtocolError;
use solana_sdk::pubkey::Pubkey;

const ACCOUNT_TYPE_STAKE_POOL: u8 = 1;

/// Byte length of the fixed head decoded here.
pub const STAKE_POOL_HEAD_LEN: usize = 1 + 32 * 3 + 1 + 32 * 5 + 8 * 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakePoolState {
    pub manager: Pubkey,
    pub staker: Pubkey,
    pub stake_deposit_authority: Pubkey,
    pub stake_withdraw_bump_seed: u8,
    pub validator_list: Pubkey,
    pub reserve_stake: Pubkey,
    pub pool_mint: Pubkey,
    pub manager_fee_account: Pubkey,
    pub token_program_id: Pubkey,
    pub total_lamports: u64,
    pub pool_token_supply: u64,
    pub last_update_epoch: u64,
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn u8(&mut self) -> u8 {
        let value = self.data[self.offset];
        self.offset += 1;
        value
    }

    fn pubkey(&mut self) -> Pubkey {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + 32]);
        self.offset += 32;
        Pubkey::new_from_array(bytes)
    }

    fn u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_le_bytes(bytes)
    }
}

impl StakePoolState {
    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < STAKE_POOL_HEAD_LEN {
            return Err(ProtocolError::AccountDecode {
                account: address.to_string(),
                reason: format!(
                    "stake pool account is {} bytes, expected at least {STAKE_POOL_HEAD_LEN}",
                    data.len()
                ),
            });
        }

        let mut reader = Reader { data, offset: 0 };
        let account_type = reader.u8();
        if account_type != ACCOUNT_TYPE_STAKE_POOL {
            return Err(ProtocolError::AccountDecode {
                account: address.to_string(),
                reason: format!("account type {account_type} is not a stake pool"),
            });
        }

        Ok(Self {
            manager: reader.pubkey(),
            staker: reader.pubkey(),
            stake_deposit_authority: reader.pubkey(),
            stake_withdraw_bump_seed: reader.u8(),
            validator_list: reader.pubkey(),
            reserve_stake: reader.pubkey(),
            pool_mint: reader.pubkey(),
            manager_fee_account: reader.pubkey(),
            token_program_id: reader.pubkey(),
            total_lamports: reader.u64(),
            pool_token_supply: reader.u64(),
            last_update_epoch: reader.u64(),
        })
    }

    /// SOL backing one pool token.
    pub fn exchange_rate(&self) -> f64 {
        if self.pool_token_supply == 0 {
            return 1.0;
        }
        self.total_lamports as f64 / self.pool_token_supply as f64
    }

    pub fn tvl_sol(&self) -> f64 {
        solstake_lib::constants::lamports_to_sol(self.total_lamports)
    }
}

/// Serializes a state head the way the on-chain program lays it out.
#[cfg(test)]
pub(crate) fn encode_for_test(state: &StakePoolState) -> Vec<u8> {
    let mut data = vec![ACCOUNT_TYPE_STAKE_POOL];
    data.extend_from_slice(state.manager.as_ref());
    data.extend_from_slice(state.staker.as_ref());
    data.extend_from_slice(state.stake_deposit_authority.as_ref());
    data.push(state.stake_withdraw_bump_seed);
    data.extend_from_slice(state.validator_list.as_ref());
    data.extend_from_slice(state.reserve_stake.as_ref());
    data.extend_from_slice(state.pool_mint.as_ref());
    data.extend_from_slice(state.manager_fee_account.as_ref());
    data.extend_from_slice(state.token_program_id.as_ref());
    data.extend_from_slice(&state.total_lamports.to_le_bytes());
    data.extend_from_slice(&state.pool_token_supply.to_le_bytes());
    data.extend_from_slice(&state.last_update_epoch.to_le_bytes());
    // trailing fee fields the decoder ignores
    data.extend_from_slice(&[0u8; 64]);
    data
}

#[cfg(test)]
pub(crate) fn sample_state() -> StakePoolState {
    StakePoolState {
        manager: Pubkey::new_unique(),
        staker: Pubkey::new_unique(),
        stake_deposit_authority: Pubkey::new_unique(),
        stake_withdraw_bump_seed: 254,
        validator_list: Pubkey::new_unique(),
        reserve_stake: Pubkey::new_unique(),
        pool_mint: Pubkey::new_unique(),
        manager_fee_account: Pubkey::new_unique(),
        token_program_id: spl_token::ID,
        total_lamports: 12_500_000 * 1_000_000_000,
        pool_token_supply: 10_000_000 * 1_000_000_000,
        last_update_epoch: 712,
    }
}
