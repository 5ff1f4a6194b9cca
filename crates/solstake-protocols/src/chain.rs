//! Read access to the chain
//!
//! Adapters only need a handful of RPC reads. They go through [`ChainReader`]
//! so pool decoding and transaction assembly can run against an in-memory
//! ledger in tests.

use crate::common::ProtocolError;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use std::collections::HashMap;

/// Raw supply of a token mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSupply {
    pub amount: u64,
    pub decimals: u8,
}

impl TokenSupply {
    pub fn ui_amount(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.decimals as i32)
    }
}

#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>, ProtocolError>;

    async fn balance(&self, address: &Pubkey) -> Result<u64, ProtocolError>;

    async fn token_supply(&self, mint: &Pubkey) -> Result<TokenSupply, ProtocolError>;

    async fn latest_blockhash(&self) -> Result<Hash, ProtocolError>;
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>, ProtocolError> {
        self.get_account_data(address)
            .await
            .map_err(|e| ProtocolError::Rpc(format!("getAccountInfo {address}: {e}")))
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, ProtocolError> {
        self.get_balance(address)
            .await
            .map_err(|e| ProtocolError::Rpc(format!("getBalance {address}: {e}")))
    }

    async fn token_supply(&self, mint: &Pubkey) -> Result<TokenSupply, ProtocolError> {
        let supply = self
            .get_token_supply(mint)
            .await
            .map_err(|e| ProtocolError::Rpc(format!("getTokenSupply {mint}: {e}")))?;
        let amount = supply.amount.parse::<u64>().map_err(|e| {
            ProtocolError::Rpc(format!("getTokenSupply {mint}: bad amount {}: {e}", supply.amount))
        })?;
        Ok(TokenSupply {
            amount,
            decimals: supply.decimals,
        })
    }

    async fn latest_blockhash(&self) -> Result<Hash, ProtocolError> {
        self.get_latest_blockhash()
            .await
            .map_err(|e| ProtocolError::Rpc(format!("getLatestBlockhash: {e}")))
    }
}

/// In-memory ledger used by tests and offline dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryChain {
    accounts: HashMap<Pubkey, Vec<u8>>,
    balances: HashMap<Pubkey, u64>,
    supplies: HashMap<Pubkey, TokenSupply>,
    blockhash: Hash,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.insert(address, data);
        self
    }

    pub fn with_balance(mut self, address: Pubkey, lamports: u64) -> Self {
        self.balances.insert(address, lamports);
        self
    }

    pub fn with_supply(mut self, mint: Pubkey, supply: TokenSupply) -> Self {
        self.supplies.insert(mint, supply);
        self
    }

    pub fn with_blockhash(mut self, blockhash: Hash) -> Self {
        self.blockhash = blockhash;
        self
    }
}

#[async_trait]
impl ChainReader for MemoryChain {
    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>, ProtocolError> {
        self.accounts
            .get(address)
            .cloned()
            .ok_or_else(|| ProtocolError::Rpc(format!("AccountNotFound: pubkey={address}")))
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, ProtocolError> {
        Ok(self.balances.get(address).copied().unwrap_or(0))
    }

    async fn token_supply(&self, mint: &Pubkey) -> Result<TokenSupply, ProtocolError> {
        self.supplies
            .get(mint)
            .copied()
            .ok_or_else(|| ProtocolError::Rpc(format!("could not find mint {mint}")))
    }

    async fn latest_blockhash(&self) -> Result<Hash, ProtocolError> {
        Ok(self.blockhash)
    }
}
