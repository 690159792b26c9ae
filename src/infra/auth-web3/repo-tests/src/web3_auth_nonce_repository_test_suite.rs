// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use dill::Catalog;
use pretty_assertions::assert_eq;
use tollgate_auth_web3::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0)
        .unwrap()
        .round_subsecs(6)
}

fn nonce_entity(nonce: &str, expires_at: DateTime<Utc>) -> Web3AuthEip4361NonceEntity {
    Web3AuthEip4361NonceEntity {
        nonce: Web3AuthEip4361Nonce::try_new(nonce).unwrap(),
        expires_at,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_consume_unknown_nonce(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let nonce = Web3AuthEip4361Nonce::try_new("unknownNonce1").unwrap();
    assert_eq!(
        nonce_repo.consume_nonce(&nonce, t0()).await,
        Err(ConsumeNonceError::NotFound(NonceNotFoundError {
            nonce: nonce.clone()
        }))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_nonce_consumed_exactly_once(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let entity = nonce_entity("abcdEFGH1234", t0() + Duration::minutes(5));
    nonce_repo.set_nonce(&entity).await.unwrap();

    assert_eq!(nonce_repo.consume_nonce(&entity.nonce, t0()).await, Ok(()));
    assert_matches!(
        nonce_repo.consume_nonce(&entity.nonce, t0()).await,
        Err(ConsumeNonceError::NotFound(_))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_expired_nonce_not_consumed(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let expires_at = t0() + Duration::minutes(5);
    let entity = nonce_entity("expiringNonce1", expires_at);
    nonce_repo.set_nonce(&entity).await.unwrap();

    // Expiry is exclusive: at `expires_at` the nonce is already gone
    assert_matches!(
        nonce_repo.consume_nonce(&entity.nonce, expires_at).await,
        Err(ConsumeNonceError::NotFound(_))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_concurrent_consumption_single_winner(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let entity = nonce_entity("raceNonce0001", t0() + Duration::minutes(5));
    nonce_repo.set_nonce(&entity).await.unwrap();

    let attempts = (0..8).map(|_| nonce_repo.consume_nonce(&entity.nonce, t0()));
    let results = futures::future::join_all(attempts).await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(
        results
            .iter()
            .all(|r| matches!(r, Ok(()) | Err(ConsumeNonceError::NotFound(_))))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_cleanup_expired_nonces(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let expired_a = nonce_entity("expiredNonceA", t0() - Duration::minutes(1));
    let expired_b = nonce_entity("expiredNonceB", t0());
    let alive = nonce_entity("aliveNonce001", t0() + Duration::minutes(1));
    for entity in [&expired_a, &expired_b, &alive] {
        nonce_repo.set_nonce(entity).await.unwrap();
    }

    assert_eq!(nonce_repo.cleanup_expired_nonces(t0()).await, Ok(2));
    assert_eq!(nonce_repo.cleanup_expired_nonces(t0()).await, Ok(0));

    assert_eq!(nonce_repo.consume_nonce(&alive.nonce, t0()).await, Ok(()));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
