//! Common protocol abstractions and utilities
//!
//! This module provides the error type, metric records and traits shared by
//! every staking protocol adapter.

use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, transaction::VersionedTransaction};
use solstake_lib::{ProtocolId, RawInstruction};
use thiserror::Error;

pub mod metrics;
pub mod traits;

pub use metrics::*;
pub use traits::*;

/// Common error types for all protocols
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Failed to decode {account}: {reason}")]
    AccountDecode { account: String, reason: String },
    #[error("Protocol-specific error: {protocol} - {message}")]
    ProtocolSpecific { protocol: String, message: String },
    #[error("Timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl ProtocolError {
    pub fn specific(protocol: ProtocolId, message: impl Into<String>) -> Self {
        Self::ProtocolSpecific {
            protocol: protocol.to_string(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ProtocolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProtocolError::Timeout {
                timeout_ms: solstake_lib::env::timeouts::http_request().as_millis() as u64,
            }
        } else {
            ProtocolError::Network(err.to_string())
        }
    }
}

/// APY and TVL of one staking pool at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMetrics {
    pub protocol: ProtocolId,
    /// Annual yield as a fraction, 0.07 means 7%
    pub apy: f64,
    /// Total value locked in SOL
    pub tvl_sol: f64,
    pub lst_mint: String,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

impl PoolMetrics {
    pub fn apy_percent(&self) -> f64 {
        self.apy * 100.0
    }
}

/// What an adapter produces for a stake request.
///
/// Most protocols are built locally from instructions. Some only expose an API
/// that returns a ready-made transaction for the user to sign.
#[derive(Debug, Clone)]
pub enum StakeInstructions {
    Instructions(Vec<Instruction>),
    Transaction(VersionedTransaction),
}

impl StakeInstructions {
    /// Instructions in agent-facing form. Pre-built transactions have none.
    pub fn raw_instructions(&self) -> Vec<RawInstruction> {
        match self {
            StakeInstructions::Instructions(ixs) => ixs.iter().map(RawInstruction::from).collect(),
            StakeInstructions::Transaction(_) => Vec::new(),
        }
    }
}
