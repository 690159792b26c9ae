// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use assert_matches::assert_matches;
use indoc::indoc;
use tollgate_accounts::{FederatedSessionProvider, SessionReconciler};
use tollgate_auth_web3::{Web3HandshakeVerifier, Web3NonceService};
use tollgate_entitlements::{EntitlementResolver, EntitlementSyncService};
use tollgate_entitlements_services::TierGuard;
use tollgate_server::{ConfigError, ServerConfig, ServerError, configure_base_catalog};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const IN_MEMORY_CONFIG: &str = indoc!(
    r#"
    session:
      baseSecret: "a-base-secret-that-is-long-enough-for-derivation"
      cookieSecure: false
    chain:
      contractAddress: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
      premiumTokenIds: "1,2"
      enterpriseTokenIds: "3"
    "#
);

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_in_memory_catalog_resolves_all_services() {
    let config = ServerConfig::from_yaml(IN_MEMORY_CONFIG).unwrap();

    let catalog = configure_base_catalog(&config).await.unwrap().build();

    catalog.get_one::<dyn SessionReconciler>().unwrap();
    catalog.get_one::<dyn Web3HandshakeVerifier>().unwrap();
    catalog.get_one::<dyn EntitlementResolver>().unwrap();
    catalog.get_one::<dyn EntitlementSyncService>().unwrap();
    catalog.get_one::<dyn FederatedSessionProvider>().unwrap();
    catalog.get_one::<TierGuard>().unwrap();

    let nonce_service = catalog.get_one::<dyn Web3NonceService>().unwrap();
    assert_eq!(nonce_service.cleanup_expired_nonces().await.unwrap(), 0);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_federated_provider_registered_when_configured() {
    let config = ServerConfig::from_yaml(&format!(
        "{IN_MEMORY_CONFIG}federated:\n  sessionUrl: \"http://127.0.0.1:3000/api/auth/session\"\n"
    ))
    .unwrap();

    let catalog = configure_base_catalog(&config).await.unwrap().build();

    catalog.get_one::<dyn FederatedSessionProvider>().unwrap();
    catalog.get_one::<dyn SessionReconciler>().unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_catalog_requires_session_secret() {
    let config = ServerConfig::from_yaml("").unwrap();

    assert_matches!(
        configure_base_catalog(&config).await.map(|_| ()),
        Err(ServerError::Config(ConfigError::MissingSessionSecret))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_catalog_rejects_invalid_contract_address() {
    let config = ServerConfig::from_yaml(indoc!(
        r#"
        session:
          baseSecret: "a-base-secret-that-is-long-enough-for-derivation"
        chain:
          contractAddress: "not-an-address"
        "#
    ))
    .unwrap();

    assert_matches!(
        configure_base_catalog(&config).await.map(|_| ()),
        Err(ServerError::Config(ConfigError::InvalidContractAddress(_)))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
