use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use std::str::FromStr;

/// A JSON-friendly representation of a Solana instruction.
///
/// Agents and tools exchange instructions in this form; `data` is base58.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInstruction {
    pub program_id: String,
    pub accounts: Vec<RawAccountMeta>,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccountMeta {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl From<&Instruction> for RawInstruction {
    fn from(instruction: &Instruction) -> Self {
        let accounts = instruction
            .accounts
            .iter()
            .map(|acc| RawAccountMeta {
                pubkey: acc.pubkey.to_string(),
                is_signer: acc.is_signer,
                is_writable: acc.is_writable,
            })
            .collect();

        Self {
            program_id: instruction.program_id.to_string(),
            accounts,
            data: bs58::encode(&instruction.data).into_string(),
        }
    }
}

impl TryFrom<&RawInstruction> for Instruction {
    type Error = anyhow::Error;

    fn try_from(raw: &RawInstruction) -> Result<Self> {
        let program_id = Pubkey::from_str(&raw.program_id)
            .map_err(|e| anyhow!("Invalid program ID: {}: {}", raw.program_id, e))?;

        let mut accounts = Vec::with_capacity(raw.accounts.len());
        for acc in &raw.accounts {
            let pubkey = Pubkey::from_str(&acc.pubkey)
                .map_err(|e| anyhow!("Invalid account pubkey: {}: {}", acc.pubkey, e))?;
            accounts.push(AccountMeta {
                pubkey,
                is_signer: acc.is_signer,
                is_writable: acc.is_writable,
            });
        }

        let data = bs58::decode(&raw.data)
            .into_vec()
            .map_err(|e| anyhow!("Failed to decode instruction data: {e}"))?;

        Ok(Instruction {
            program_id,
            accounts,
            data,
        })
    }
}
