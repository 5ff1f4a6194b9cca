//! Pool-data provider
//!
//! Aggregates APY and TVL across every registered protocol. Protocols are
//! queried one after another, each under a fixed retry loop. The aggregated
//! snapshot lives in a single cache slot until its TTL runs out.

mod retry;
mod summary;

pub use retry::{retry, RetryPolicy};
pub use summary::format_pool_summary;

use crate::common::{PoolMetrics, StakeProtocol};
use serde::{Deserialize, Serialize};
use solstake_lib::ProtocolId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum PoolDataError {
    #[error("No staking protocols are registered")]
    NoProtocols,
    #[error("Failed to fetch pool data from every protocol: {}", summarize(.0))]
    AllFailed(Vec<ProtocolFailure>),
}

fn summarize(failures: &[ProtocolFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.protocol, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A protocol whose metrics could not be fetched after all retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolFailure {
    pub protocol: ProtocolId,
    pub error: String,
}

/// Aggregated pool metrics from one fetch round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pools: Vec<PoolMetrics>,
    pub failures: Vec<ProtocolFailure>,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

impl PoolSnapshot {
    pub fn get(&self, protocol: ProtocolId) -> Option<&PoolMetrics> {
        self.pools.iter().find(|p| p.protocol == protocol)
    }

    /// Highest-APY pool. Ties keep registration order.
    pub fn best_by_apy(&self) -> Option<&PoolMetrics> {
        self.pools.iter().fold(None, |best, pool| match best {
            Some(b) if b.apy >= pool.apy => Some(b),
            _ => Some(pool),
        })
    }

    pub fn sorted_by_apy(&self) -> Vec<&PoolMetrics> {
        let mut pools: Vec<&PoolMetrics> = self.pools.iter().collect();
        pools.sort_by(|a, b| b.apy.total_cmp(&a.apy));
        pools
    }

    pub fn total_tvl_sol(&self) -> f64 {
        self.pools.iter().map(|p| p.tvl_sol).sum()
    }

    /// Keeps only the given protocol's entry.
    pub fn filtered(&self, protocol: ProtocolId) -> PoolSnapshot {
        PoolSnapshot {
            pools: self.get(protocol).cloned().into_iter().collect(),
            failures: self
                .failures
                .iter()
                .filter(|f| f.protocol == protocol)
                .cloned()
                .collect(),
            fetched_at: self.fetched_at,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: PoolSnapshot,
    stored_at: Instant,
}

impl CachedSnapshot {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

pub struct PoolDataProvider {
    protocols: Vec<Arc<dyn StakeProtocol>>,
    ttl: Duration,
    retry: RetryPolicy,
    cache: Mutex<Option<CachedSnapshot>>,
}

impl PoolDataProvider {
    pub fn new(protocols: Vec<Arc<dyn StakeProtocol>>, ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            protocols,
            ttl,
            retry,
            cache: Mutex::new(None),
        }
    }

    /// Provider tuned from `POOL_DATA_*` environment variables.
    pub fn from_env(protocols: Vec<Arc<dyn StakeProtocol>>) -> Self {
        Self::new(
            protocols,
            solstake_lib::env::pool_data::cache_ttl(),
            RetryPolicy::from_env(),
        )
    }

    pub fn protocols(&self) -> &[Arc<dyn StakeProtocol>] {
        &self.protocols
    }

    /// Returns cached data while fresh, otherwise fetches every protocol.
    ///
    /// The cache lock is held for the whole fetch, so concurrent callers wait
    /// for one round instead of starting their own.
    #[instrument(skip(self))]
    pub async fn get_pool_data(&self) -> Result<PoolSnapshot, PoolDataError> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if !cached.is_expired(self.ttl) {
                debug!(
                    age_ms = cached.stored_at.elapsed().as_millis() as u64,
                    "Serving pool data from cache"
                );
                return Ok(cached.snapshot.clone());
            }
            debug!("Cached pool data expired");
        }

        let snapshot = self.fetch_all().await?;
        *cache = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            stored_at: Instant::now(),
        });
        Ok(snapshot)
    }

    /// Cached snapshot if present and fresh, without fetching.
    pub async fn cached(&self) -> Option<PoolSnapshot> {
        self.cache
            .lock()
            .await
            .as_ref()
            .filter(|c| !c.is_expired(self.ttl))
            .map(|c| c.snapshot.clone())
    }

    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
        debug!("Pool data cache invalidated");
    }

    async fn fetch_all(&self) -> Result<PoolSnapshot, PoolDataError> {
        if self.protocols.is_empty() {
            return Err(PoolDataError::NoProtocols);
        }

        let started = Instant::now();
        let mut pools = Vec::with_capacity(self.protocols.len());
        let mut failures = Vec::new();

        for protocol in &self.protocols {
            let operation = format!("{}.fetch_metrics", protocol.name());
            match retry(&self.retry, &operation, move || protocol.fetch_metrics()).await {
                Ok(metrics) => {
                    debug!(
                        protocol = protocol.name(),
                        apy = metrics.apy,
                        tvl_sol = metrics.tvl_sol,
                        "Fetched pool metrics"
                    );
                    pools.push(metrics);
                }
                Err(e) => {
                    warn!(
                        protocol = protocol.name(),
                        error = %e,
                        "Giving up on pool metrics after {} attempts",
                        self.retry.attempts()
                    );
                    failures.push(ProtocolFailure {
                        protocol: protocol.id(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if pools.is_empty() {
            return Err(PoolDataError::AllFailed(failures));
        }

        info!(
            pools = pools.len(),
            failures = failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated pool data"
        );

        Ok(PoolSnapshot {
            pools,
            failures,
            fetched_at: chrono::Utc::now(),
        })
    }
}
