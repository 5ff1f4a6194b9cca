//! Wiring of every supported protocol adapter.

use crate::chain::ChainReader;
use crate::common::StakeProtocol;
use crate::marinade::{MarinadeAccounts, MarinadeProtocol};
use crate::sanctum::SanctumClient;
use crate::solayer::SolayerProtocol;
use crate::spl_stake_pool::{SplPoolConfig, SplStakePool};
use solstake_lib::{env, ProtocolId};
use std::sync::Arc;
use tracing::{debug, info};

/// Base URLs of the RPC node and the protocol APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub rpc_url: String,
    pub sanctum_url: String,
    pub marinade_url: String,
    pub solayer_url: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            rpc_url: env::network::solana_rpc_url(),
            sanctum_url: env::network::sanctum_api_url(),
            marinade_url: env::network::marinade_api_url(),
            solayer_url: env::network::solayer_api_url(),
        }
    }
}

/// Adapters in a fixed order: Marinade first, then the SPL stake pools,
/// then Solayer. Aggregation and tie-breaking follow this order.
pub struct ProtocolRegistry {
    protocols: Vec<Arc<dyn StakeProtocol>>,
}

impl ProtocolRegistry {
    pub fn new(protocols: Vec<Arc<dyn StakeProtocol>>) -> Self {
        Self { protocols }
    }

    /// Mainnet adapters for every [`ProtocolId`].
    pub fn mainnet(chain: Arc<dyn ChainReader>, http: reqwest::Client, endpoints: &Endpoints) -> Self {
        let sanctum = SanctumClient::with_client(http.clone(), &endpoints.sanctum_url);
        let mut protocols: Vec<Arc<dyn StakeProtocol>> = Vec::with_capacity(ProtocolId::ALL.len());

        for id in ProtocolId::ALL {
            let protocol: Arc<dyn StakeProtocol> = match id {
                ProtocolId::Marinade => Arc::new(MarinadeProtocol::new(
                    MarinadeAccounts::mainnet(),
                    sanctum.clone(),
                    http.clone(),
                    &endpoints.marinade_url,
                )),
                ProtocolId::Solayer => Arc::new(SolayerProtocol::new(
                    chain.clone(),
                    sanctum.clone(),
                    http.clone(),
                    &endpoints.solayer_url,
                )),
                spl => match SplPoolConfig::mainnet(spl) {
                    Some(config) => {
                        Arc::new(SplStakePool::new(config, chain.clone(), sanctum.clone()))
                    }
                    None => {
                        debug!(protocol = %spl, "No stake pool configured, skipping");
                        continue;
                    }
                },
            };
            protocols.push(protocol);
        }

        info!(count = protocols.len(), "Registered staking protocols");
        Self::new(protocols)
    }

    pub fn get(&self, id: ProtocolId) -> Option<Arc<dyn StakeProtocol>> {
        self.protocols.iter().find(|p| p.id() == id).cloned()
    }

    pub fn all(&self) -> Vec<Arc<dyn StakeProtocol>> {
        self.protocols.clone()
    }

    pub fn ids(&self) -> Vec<ProtocolId> {
        self.protocols.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}
