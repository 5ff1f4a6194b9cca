//! Stake planning
//!
//! Checks a stake request against the wallet, picks the protocol and returns
//! the unsigned transaction the user has to sign.

use crate::chain::ChainReader;
use crate::common::ProtocolError;
use crate::pool_data::PoolDataProvider;
use crate::registry::ProtocolRegistry;
use crate::transaction::{build_unsigned_transaction, encode_transaction};
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, transaction::VersionedTransaction};
use solstake_lib::constants::{FEE_RESERVE_LAMPORTS, MIN_STAKE_LAMPORTS};
use solstake_lib::{ProtocolId, RawInstruction};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Protocol used when no pool data is available to rank by APY.
pub const FALLBACK_PROTOCOL: ProtocolId = ProtocolId::Marinade;

#[derive(Debug, Error)]
pub enum StakeError {
    #[error("Stake amount {lamports} lamports is below the minimum of {minimum} lamports")]
    AmountTooSmall { lamports: u64, minimum: u64 },
    #[error("Insufficient balance: staking needs {required} lamports including fees, wallet holds {available}")]
    InsufficientBalance { required: u64, available: u64 },
    #[error("Protocol {0} is not available")]
    UnavailableProtocol(ProtocolId),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("Failed to encode transaction: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StakeRequest {
    pub user: Pubkey,
    pub lamports: u64,
    /// `None` lets the planner pick the best-yielding pool.
    pub protocol: Option<ProtocolId>,
}

/// A stake ready for the user's signature.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedStake {
    pub protocol: ProtocolId,
    pub lamports: u64,
    /// APY as a fraction, when pool data was available.
    pub apy: Option<f64>,
    #[serde(skip)]
    pub transaction: VersionedTransaction,
    #[serde(rename = "transaction")]
    pub transaction_base64: String,
    /// The stake instructions, empty when the protocol API built the transaction.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<RawInstruction>,
}

pub struct StakePlanner {
    registry: Arc<ProtocolRegistry>,
    pool_data: Arc<PoolDataProvider>,
    chain: Arc<dyn ChainReader>,
}

impl StakePlanner {
    pub fn new(
        registry: Arc<ProtocolRegistry>,
        pool_data: Arc<PoolDataProvider>,
        chain: Arc<dyn ChainReader>,
    ) -> Self {
        Self {
            registry,
            pool_data,
            chain,
        }
    }

    pub fn registry(&self) -> &Arc<ProtocolRegistry> {
        &self.registry
    }

    pub fn pool_data(&self) -> &Arc<PoolDataProvider> {
        &self.pool_data
    }

    /// Fails unless `lamports` plus the fee reserve fits in the wallet.
    /// Returns the wallet balance.
    pub async fn check_balance(&self, user: &Pubkey, lamports: u64) -> Result<u64, StakeError> {
        if lamports < MIN_STAKE_LAMPORTS {
            return Err(StakeError::AmountTooSmall {
                lamports,
                minimum: MIN_STAKE_LAMPORTS,
            });
        }

        let available = self.chain.balance(user).await?;
        let required = lamports.saturating_add(FEE_RESERVE_LAMPORTS);
        if required > available {
            return Err(StakeError::InsufficientBalance {
                required,
                available,
            });
        }
        debug!(available, required, "Balance check passed");
        Ok(available)
    }

    /// Chosen protocol and its APY, if known.
    ///
    /// An explicit protocol only has to be registered. Otherwise the pool
    /// with the highest APY wins, falling back to [`FALLBACK_PROTOCOL`] when
    /// pool data cannot be fetched.
    pub async fn resolve_protocol(
        &self,
        requested: Option<ProtocolId>,
    ) -> Result<(ProtocolId, Option<f64>), StakeError> {
        if let Some(id) = requested {
            if self.registry.get(id).is_none() {
                return Err(StakeError::UnavailableProtocol(id));
            }
            let apy = self
                .pool_data
                .cached()
                .await
                .and_then(|snapshot| snapshot.get(id).map(|p| p.apy));
            return Ok((id, apy));
        }

        match self.pool_data.get_pool_data().await {
            Ok(snapshot) => match snapshot.best_by_apy() {
                Some(best) => {
                    info!(protocol = %best.protocol, apy = best.apy, "Selected highest-APY pool");
                    Ok((best.protocol, Some(best.apy)))
                }
                None => Ok((FALLBACK_PROTOCOL, None)),
            },
            Err(e) => {
                warn!(error = %e, "Pool data unavailable, defaulting to {}", FALLBACK_PROTOCOL);
                Ok((FALLBACK_PROTOCOL, None))
            }
        }
    }

    #[instrument(skip(self), fields(user = %request.user, lamports = request.lamports))]
    pub async fn prepare(&self, request: &StakeRequest) -> Result<PreparedStake, StakeError> {
        self.check_balance(&request.user, request.lamports).await?;

        let (protocol_id, apy) = self.resolve_protocol(request.protocol).await?;
        let protocol = self
            .registry
            .get(protocol_id)
            .ok_or(StakeError::UnavailableProtocol(protocol_id))?;

        let instructions = protocol
            .build_stake_instructions(&request.user, request.lamports)
            .await?;
        let raw_instructions = instructions.raw_instructions();
        let transaction =
            build_unsigned_transaction(self.chain.as_ref(), &request.user, instructions).await?;
        let transaction_base64 =
            encode_transaction(&transaction).map_err(|e| StakeError::Encoding(e.to_string()))?;

        info!(
            protocol = %protocol_id,
            bytes = transaction_base64.len(),
            "Prepared unsigned stake transaction"
        );

        Ok(PreparedStake {
            protocol: protocol_id,
            lamports: request.lamports,
            apy,
            transaction,
            transaction_base64,
            instructions: raw_instructions,
        })
    }
}
