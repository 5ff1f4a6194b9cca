//! End-to-end stake planning against an in-memory chain.

mod common;

use common::{vault, ScriptedProtocol};
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use solstake_lib::constants::{FEE_RESERVE_LAMPORTS, LAMPORTS_PER_SOL};
use solstake_lib::ProtocolId;
use solstake_protocols::{
    decode_transaction, MemoryChain, PoolDataProvider, ProtocolRegistry, RetryPolicy,
    StakeError, StakePlanner, StakeProtocol, StakeRequest, FALLBACK_PROTOCOL,
};
use std::sync::Arc;
use std::time::Duration;

fn planner(protocols: Vec<Arc<ScriptedProtocol>>, user: Pubkey, balance: u64) -> StakePlanner {
    let protocols: Vec<Arc<dyn StakeProtocol>> = protocols
        .into_iter()
        .map(|p| p as Arc<dyn StakeProtocol>)
        .collect();
    let chain = MemoryChain::new()
        .with_balance(user, balance)
        .with_blockhash(Hash::new_unique());
    let pool_data = PoolDataProvider::new(
        protocols.clone(),
        Duration::from_secs(60),
        RetryPolicy::new(1, Duration::ZERO),
    );
    StakePlanner::new(
        Arc::new(ProtocolRegistry::new(protocols)),
        Arc::new(pool_data),
        Arc::new(chain),
    )
}

#[tokio::test]
async fn picks_highest_apy_when_no_protocol_requested() {
    let user = Pubkey::new_unique();
    let planner = planner(
        vec![
            ScriptedProtocol::healthy(ProtocolId::Marinade, 0.068),
            ScriptedProtocol::healthy(ProtocolId::Jito, 0.079),
            ScriptedProtocol::healthy(ProtocolId::Blaze, 0.071),
        ],
        user,
        10 * LAMPORTS_PER_SOL,
    );

    let prepared = planner
        .prepare(&StakeRequest {
            user,
            lamports: 2 * LAMPORTS_PER_SOL,
            protocol: None,
        })
        .await
        .unwrap();

    assert_eq!(prepared.protocol, ProtocolId::Jito);
    assert_eq!(prepared.apy, Some(0.079));
    assert_eq!(prepared.lamports, 2 * LAMPORTS_PER_SOL);

    let decoded = decode_transaction(&prepared.transaction_base64).unwrap();
    assert_eq!(decoded, prepared.transaction);
    let keys = decoded.message.static_account_keys();
    assert_eq!(keys[0], user);
    assert!(keys.contains(&vault(ProtocolId::Jito)));

    assert_eq!(prepared.instructions.len(), 1);
    assert_eq!(prepared.instructions[0].accounts[1].pubkey, vault(ProtocolId::Jito).to_string());
}

#[tokio::test]
async fn explicit_protocol_is_used_without_fetching() {
    let user = Pubkey::new_unique();
    let marinade = ScriptedProtocol::healthy(ProtocolId::Marinade, 0.068);
    let jito = ScriptedProtocol::healthy(ProtocolId::Jito, 0.079);
    let planner = planner(vec![marinade.clone(), jito.clone()], user, 5 * LAMPORTS_PER_SOL);

    let prepared = planner
        .prepare(&StakeRequest {
            user,
            lamports: LAMPORTS_PER_SOL,
            protocol: Some(ProtocolId::Marinade),
        })
        .await
        .unwrap();

    assert_eq!(prepared.protocol, ProtocolId::Marinade);
    assert_eq!(prepared.apy, None);
    assert_eq!(marinade.calls() + jito.calls(), 0);
}

#[tokio::test]
async fn explicit_protocol_reports_cached_apy() {
    let user = Pubkey::new_unique();
    let planner = planner(
        vec![
            ScriptedProtocol::healthy(ProtocolId::Marinade, 0.068),
            ScriptedProtocol::healthy(ProtocolId::Jpool, 0.066),
        ],
        user,
        5 * LAMPORTS_PER_SOL,
    );
    planner.pool_data().get_pool_data().await.unwrap();

    let (protocol, apy) = planner
        .resolve_protocol(Some(ProtocolId::Jpool))
        .await
        .unwrap();
    assert_eq!(protocol, ProtocolId::Jpool);
    assert_eq!(apy, Some(0.066));
}

#[tokio::test]
async fn falls_back_when_pool_data_is_unavailable() {
    let user = Pubkey::new_unique();
    let planner = planner(
        vec![
            ScriptedProtocol::broken(ProtocolId::Marinade),
            ScriptedProtocol::broken(ProtocolId::Jito),
        ],
        user,
        5 * LAMPORTS_PER_SOL,
    );

    let (protocol, apy) = planner.resolve_protocol(None).await.unwrap();
    assert_eq!(protocol, FALLBACK_PROTOCOL);
    assert_eq!(apy, None);
}

#[tokio::test]
async fn unregistered_protocol_is_rejected() {
    let user = Pubkey::new_unique();
    let planner = planner(
        vec![ScriptedProtocol::healthy(ProtocolId::Marinade, 0.068)],
        user,
        5 * LAMPORTS_PER_SOL,
    );

    let err = planner
        .prepare(&StakeRequest {
            user,
            lamports: LAMPORTS_PER_SOL,
            protocol: Some(ProtocolId::Solayer),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StakeError::UnavailableProtocol(ProtocolId::Solayer)));
}

#[tokio::test]
async fn dust_amounts_are_rejected() {
    let user = Pubkey::new_unique();
    let planner = planner(
        vec![ScriptedProtocol::healthy(ProtocolId::Marinade, 0.068)],
        user,
        5 * LAMPORTS_PER_SOL,
    );

    let err = planner.check_balance(&user, 999).await.unwrap_err();
    assert!(matches!(err, StakeError::AmountTooSmall { lamports: 999, .. }));
}

#[tokio::test]
async fn fee_reserve_counts_against_the_balance() {
    let user = Pubkey::new_unique();
    let planner = planner(
        vec![ScriptedProtocol::healthy(ProtocolId::Marinade, 0.068)],
        user,
        LAMPORTS_PER_SOL,
    );

    match planner.check_balance(&user, LAMPORTS_PER_SOL).await {
        Err(StakeError::InsufficientBalance {
            required,
            available,
        }) => {
            assert_eq!(required, LAMPORTS_PER_SOL + FEE_RESERVE_LAMPORTS);
            assert_eq!(available, LAMPORTS_PER_SOL);
        }
        other => panic!("expected InsufficientBalance, got {other:?}"),
    }

    let exact = LAMPORTS_PER_SOL - FEE_RESERVE_LAMPORTS;
    assert_eq!(
        planner.check_balance(&user, exact).await.unwrap(),
        LAMPORTS_PER_SOL
    );
}
