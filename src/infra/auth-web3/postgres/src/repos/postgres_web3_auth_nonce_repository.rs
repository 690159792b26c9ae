// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use dill::{component, interface};
use internal_error::ResultIntoInternal;
use sqlx::PgPool;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct PostgresWeb3AuthNonceRepository {
    pg_pool: PgPool,
}

#[component(pub)]
#[interface(dyn Web3AuthNonceRepository)]
impl PostgresWeb3AuthNonceRepository {
    pub fn new(pg_pool: PgPool) -> Self {
        Self { pg_pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3AuthNonceRepository for PostgresWeb3AuthNonceRepository {
    async fn set_nonce(&self, entity: &Web3AuthEip4361NonceEntity) -> Result<(), SetNonceError> {
        sqlx::query(
            r#"
            INSERT INTO web3_auth_eip4361_nonces (nonce, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (nonce) DO UPDATE
                SET expires_at = excluded.expires_at
            "#,
        )
        .bind(entity.nonce.as_ref())
        .bind(entity.expires_at)
        .execute(&self.pg_pool)
        .await
        .int_err()?;

        Ok(())
    }

    async fn consume_nonce(
        &self,
        nonce: &Web3AuthEip4361Nonce,
        now: DateTime<Utc>,
    ) -> Result<(), ConsumeNonceError> {
        let delete_result = sqlx::query(
            r#"
            DELETE
            FROM web3_auth_eip4361_nonces
            WHERE nonce = $1
              AND expires_at > $2
            "#,
        )
        .bind(nonce.as_ref())
        .bind(now)
        .execute(&self.pg_pool)
        .await
        .int_err()?;

        if delete_result.rows_affected() > 0 {
            Ok(())
        } else {
            Err(ConsumeNonceError::NotFound(NonceNotFoundError {
                nonce: nonce.clone(),
            }))
        }
    }

    async fn cleanup_expired_nonces(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, CleanupExpiredNoncesError> {
        let delete_result = sqlx::query(
            r#"
            DELETE
            FROM web3_auth_eip4361_nonces
            WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pg_pool)
        .await
        .int_err()?;

        Ok(delete_result.rows_affected())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
