// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use tollgate_auth_web3_inmem::InMemoryWeb3AuthNonceRepository;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct InMemoryWeb3AuthNonceRepositoryHarness {
    catalog: Catalog,
}

impl InMemoryWeb3AuthNonceRepositoryHarness {
    pub fn new() -> Self {
        let mut catalog_builder = CatalogBuilder::new();
        catalog_builder.add::<InMemoryWeb3AuthNonceRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_consume_unknown_nonce() {
    let harness = InMemoryWeb3AuthNonceRepositoryHarness::new();
    tollgate_auth_web3_repo_tests::test_consume_unknown_nonce(&harness.catalog).await;
}

#[test_log::test(tokio::test)]
async fn test_nonce_consumed_exactly_once() {
    let harness = InMemoryWeb3AuthNonceRepositoryHarness::new();
    tollgate_auth_web3_repo_tests::test_nonce_consumed_exactly_once(&harness.catalog).await;
}

#[test_log::test(tokio::test)]
async fn test_expired_nonce_not_consumed() {
    let harness = InMemoryWeb3AuthNonceRepositoryHarness::new();
    tollgate_auth_web3_repo_tests::test_expired_nonce_not_consumed(&harness.catalog).await;
}

#[test_log::test(tokio::test)]
async fn test_concurrent_consumption_single_winner() {
    let harness = InMemoryWeb3AuthNonceRepositoryHarness::new();
    tollgate_auth_web3_repo_tests::test_concurrent_consumption_single_winner(&harness.catalog).await;
}

#[test_log::test(tokio::test)]
async fn test_cleanup_expired_nonces() {
    let harness = InMemoryWeb3AuthNonceRepositoryHarness::new();
    tollgate_auth_web3_repo_tests::test_cleanup_expired_nonces(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
