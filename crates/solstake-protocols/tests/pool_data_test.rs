//! Pool-data provider behaviour against scripted protocols.

mod common;

use common::ScriptedProtocol;
use solstake_lib::ProtocolId;
use solstake_protocols::{PoolDataError, PoolDataProvider, RetryPolicy, StakeProtocol};
use std::sync::Arc;
use std::time::Duration;

fn provider(protocols: Vec<Arc<ScriptedProtocol>>, ttl: Duration, attempts: u32) -> PoolDataProvider {
    let protocols = protocols
        .into_iter()
        .map(|p| p as Arc<dyn StakeProtocol>)
        .collect();
    PoolDataProvider::new(protocols, ttl, RetryPolicy::new(attempts, Duration::ZERO))
}

#[tokio::test]
async fn serves_second_call_from_cache() {
    let marinade = ScriptedProtocol::healthy(ProtocolId::Marinade, 0.07);
    let jito = ScriptedProtocol::healthy(ProtocolId::Jito, 0.08);
    let provider = provider(vec![marinade.clone(), jito.clone()], Duration::from_secs(60), 3);

    let first = provider.get_pool_data().await.unwrap();
    let second = provider.get_pool_data().await.unwrap();

    assert_eq!(first.pools.len(), 2);
    assert_eq!(first.fetched_at, second.fetched_at);
    assert_eq!(marinade.calls(), 1);
    assert_eq!(jito.calls(), 1);
    assert_eq!(second.best_by_apy().unwrap().protocol, ProtocolId::Jito);
}

#[tokio::test]
async fn refetches_after_ttl_expires() {
    let marinade = ScriptedProtocol::healthy(ProtocolId::Marinade, 0.07);
    let provider = provider(vec![marinade.clone()], Duration::from_millis(20), 1);

    provider.get_pool_data().await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(provider.cached().await.is_none());

    provider.get_pool_data().await.unwrap();
    assert_eq!(marinade.calls(), 2);
}

#[tokio::test]
async fn retries_transient_failures() {
    let jito = ScriptedProtocol::flaky(ProtocolId::Jito, 0.08, 2);
    let provider = provider(vec![jito.clone()], Duration::from_secs(60), 3);

    let snapshot = provider.get_pool_data().await.unwrap();

    assert_eq!(jito.calls(), 3);
    assert!(snapshot.failures.is_empty());
    assert_eq!(snapshot.get(ProtocolId::Jito).unwrap().apy, 0.08);
}

#[tokio::test]
async fn partial_failures_are_reported_alongside_successes() {
    let marinade = ScriptedProtocol::healthy(ProtocolId::Marinade, 0.07);
    let solayer = ScriptedProtocol::broken(ProtocolId::Solayer);
    let provider = provider(vec![marinade, solayer.clone()], Duration::from_secs(60), 2);

    let snapshot = provider.get_pool_data().await.unwrap();

    assert_eq!(solayer.calls(), 2);
    assert_eq!(snapshot.pools.len(), 1);
    assert_eq!(snapshot.failures.len(), 1);
    assert_eq!(snapshot.failures[0].protocol, ProtocolId::Solayer);
    assert!(snapshot.failures[0].error.contains("solayer is down"));
}

#[tokio::test]
async fn all_failed_is_an_error_and_leaves_cache_empty() {
    let jito = ScriptedProtocol::broken(ProtocolId::Jito);
    let blaze = ScriptedProtocol::broken(ProtocolId::Blaze);
    let provider = provider(vec![jito, blaze], Duration::from_secs(60), 1);

    match provider.get_pool_data().await {
        Err(PoolDataError::AllFailed(failures)) => {
            let ids: Vec<_> = failures.iter().map(|f| f.protocol).collect();
            assert_eq!(ids, vec![ProtocolId::Jito, ProtocolId::Blaze]);
        }
        other => panic!("expected AllFailed, got {other:?}"),
    }
    assert!(provider.cached().await.is_none());
}

#[tokio::test]
async fn no_protocols_is_an_error() {
    let provider = provider(Vec::new(), Duration::from_secs(60), 1);
    assert!(matches!(
        provider.get_pool_data().await,
        Err(PoolDataError::NoProtocols)
    ));
}

#[tokio::test]
async fn invalidate_forces_a_fresh_fetch() {
    let marinade = ScriptedProtocol::healthy(ProtocolId::Marinade, 0.07);
    let provider = provider(vec![marinade.clone()], Duration::from_secs(60), 1);

    provider.get_pool_data().await.unwrap();
    assert!(provider.cached().await.is_some());

    provider.invalidate().await;
    assert!(provider.cached().await.is_none());

    provider.get_pool_data().await.unwrap();
    assert_eq!(marinade.calls(), 2);
}

#[tokio::test]
async fn concurrent_callers_share_one_fetch() {
    let marinade = ScriptedProtocol::healthy(ProtocolId::Marinade, 0.07);
    let provider = Arc::new(provider(vec![marinade.clone()], Duration::from_secs(60), 1));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let provider = provider.clone();
            tokio::spawn(async move { provider.get_pool_data().await.map(|s| s.pools.len()) })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }
    assert_eq!(marinade.calls(), 1);
}
