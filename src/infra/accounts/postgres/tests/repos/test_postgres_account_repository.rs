// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use sqlx::PgPool;
use tollgate_accounts_postgres::PostgresAccountRepository;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct PostgresAccountRepositoryHarness {
    catalog: Catalog,
}

impl PostgresAccountRepositoryHarness {
    pub fn new(pg_pool: PgPool) -> Self {
        let mut catalog_builder = CatalogBuilder::new();
        catalog_builder.add_value(pg_pool);
        catalog_builder.add::<PostgresAccountRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[sqlx::test(migrations = "../../../../migrations/postgres")]
#[ignore = "requires a Postgres instance at DATABASE_URL"]
async fn test_missing_account_not_found(pg_pool: PgPool) {
    let harness = PostgresAccountRepositoryHarness::new(pg_pool);
    tollgate_accounts_repo_tests::test_missing_account_not_found(&harness.catalog).await;
}

#[sqlx::test(migrations = "../../../../migrations/postgres")]
#[ignore = "requires a Postgres instance at DATABASE_URL"]
async fn test_create_and_get_account(pg_pool: PgPool) {
    let harness = PostgresAccountRepositoryHarness::new(pg_pool);
    tollgate_accounts_repo_tests::test_create_and_get_account(&harness.catalog).await;
}

#[sqlx::test(migrations = "../../../../migrations/postgres")]
#[ignore = "requires a Postgres instance at DATABASE_URL"]
async fn test_create_duplicate_account(pg_pool: PgPool) {
    let harness = PostgresAccountRepositoryHarness::new(pg_pool);
    tollgate_accounts_repo_tests::test_create_duplicate_account(&harness.catalog).await;
}

#[sqlx::test(migrations = "../../../../migrations/postgres")]
#[ignore = "requires a Postgres instance at DATABASE_URL"]
async fn test_upsert_wallet_account(pg_pool: PgPool) {
    let harness = PostgresAccountRepositoryHarness::new(pg_pool);
    tollgate_accounts_repo_tests::test_upsert_wallet_account(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
