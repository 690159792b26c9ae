// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use dill::{component, interface};
use internal_error::{ErrorIntoInternal, InternalError, ResultIntoInternal};
use sqlx::PgPool;
use tollgate_accounts::{AccountID, WalletAddressConvertor};

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const ENTITLEMENT_COLUMNS: &str = r#"
    user_id,
    wallet_address,
    token_id,
    tier,
    status,
    usage_workflows,
    usage_monthly_executions,
    usage_knowledge_bases,
    usage_collaborator_seats,
    created_at,
    updated_at
"#;

const USAGE_COLUMNS: &str = r#"
    usage_workflows,
    usage_monthly_executions,
    usage_knowledge_bases,
    usage_collaborator_seats
"#;

const WALLET_ADDRESS_UNIQUE_INDEX: &str = "idx_entitlements_wallet_address";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct PostgresEntitlementRepository {
    pg_pool: PgPool,
}

#[component(pub)]
#[interface(dyn EntitlementRepository)]
impl PostgresEntitlementRepository {
    pub fn new(pg_pool: PgPool) -> Self {
        Self { pg_pool }
    }
}

fn usage_column(category: ResourceCategory) -> &'static str {
    match category {
        ResourceCategory::Workflows => "usage_workflows",
        ResourceCategory::MonthlyExecutions => "usage_monthly_executions",
        ResourceCategory::KnowledgeBases => "usage_knowledge_bases",
        ResourceCategory::CollaboratorSeats => "usage_collaborator_seats",
    }
}

fn to_db_counter(value: u64) -> Result<i64, InternalError> {
    i64::try_from(value).int_err()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl EntitlementRepository for PostgresEntitlementRepository {
    async fn get_entitlement_by_user_id(
        &self,
        user_id: &AccountID,
    ) -> Result<EntitlementRecord, GetEntitlementError> {
        let maybe_row = sqlx::query_as::<_, EntitlementRowModel>(&format!(
            "SELECT {ENTITLEMENT_COLUMNS} FROM entitlements WHERE user_id = $1"
        ))
        .bind(user_id.as_ref())
        .fetch_optional(&self.pg_pool)
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(GetEntitlementError::NotFound(EntitlementNotFoundError {
                user_id: user_id.clone(),
            })),
        }
    }

    async fn upsert_entitlement(
        &self,
        record: &EntitlementRecord,
    ) -> Result<EntitlementRecord, UpsertEntitlementError> {
        let row = sqlx::query_as::<_, EntitlementRowModel>(&format!(
            r#"
            INSERT INTO entitlements (user_id, wallet_address, token_id, tier, status,
                                      usage_workflows, usage_monthly_executions,
                                      usage_knowledge_bases, usage_collaborator_seats,
                                      created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE
                SET wallet_address = excluded.wallet_address,
                    token_id       = excluded.token_id,
                    tier           = excluded.tier,
                    status         = CASE WHEN entitlements.status = 'revoked'
                                              THEN entitlements.status
                                              ELSE excluded.status
                                         END,
                    updated_at     = excluded.updated_at
            RETURNING {ENTITLEMENT_COLUMNS}
            "#
        ))
        .bind(record.user_id.as_ref())
        .bind(WalletAddressConvertor::lowercase_string(&record.wallet_address))
        .bind(record.token_id.map(|token_id| token_id.to_string()))
        .bind(record.tier.to_string())
        .bind(record.status.to_string())
        .bind(to_db_counter(record.usage.workflows)?)
        .bind(to_db_counter(record.usage.monthly_executions)?)
        .bind(to_db_counter(record.usage.knowledge_bases)?)
        .bind(to_db_counter(record.usage.collaborator_seats)?)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pg_pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(WALLET_ADDRESS_UNIQUE_INDEX) =>
            {
                UpsertEntitlementError::DuplicateWallet(EntitlementDuplicateWalletError {
                    wallet_address: record.wallet_address,
                })
            }
            _ => UpsertEntitlementError::Internal(e.int_err()),
        })?;

        Ok(row.try_into()?)
    }

    async fn set_entitlement_status(
        &self,
        user_id: &AccountID,
        status: EntitlementStatus,
        now: DateTime<Utc>,
    ) -> Result<EntitlementRecord, SetEntitlementStatusError> {
        let maybe_row = sqlx::query_as::<_, EntitlementRowModel>(&format!(
            r#"
            UPDATE entitlements
            SET status     = $2,
                updated_at = $3
            WHERE user_id = $1
            RETURNING {ENTITLEMENT_COLUMNS}
            "#
        ))
        .bind(user_id.as_ref())
        .bind(status.to_string())
        .bind(now)
        .fetch_optional(&self.pg_pool)
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(SetEntitlementStatusError::NotFound(
                EntitlementNotFoundError {
                    user_id: user_id.clone(),
                },
            )),
        }
    }

    async fn increment_usage(
        &self,
        user_id: &AccountID,
        category: ResourceCategory,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Result<UsageCounters, IncrementUsageError> {
        let column = usage_column(category);

        let maybe_row = sqlx::query_as::<_, UsageRowModel>(&format!(
            r#"
            UPDATE entitlements
            SET {column}   = {column} + $2,
                updated_at = $3
            WHERE user_id = $1
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(user_id.as_ref())
        .bind(to_db_counter(amount)?)
        .bind(now)
        .fetch_optional(&self.pg_pool)
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(IncrementUsageError::NotFound(EntitlementNotFoundError {
                user_id: user_id.clone(),
            })),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, sqlx::FromRow)]
struct UsageRowModel {
    usage_workflows: i64,
    usage_monthly_executions: i64,
    usage_knowledge_bases: i64,
    usage_collaborator_seats: i64,
}

impl TryFrom<UsageRowModel> for UsageCounters {
    type Error = InternalError;

    fn try_from(row: UsageRowModel) -> Result<Self, Self::Error> {
        Ok(UsageCounters {
            workflows: u64::try_from(row.usage_workflows).int_err()?,
            monthly_executions: u64::try_from(row.usage_monthly_executions).int_err()?,
            knowledge_bases: u64::try_from(row.usage_knowledge_bases).int_err()?,
            collaborator_seats: u64::try_from(row.usage_collaborator_seats).int_err()?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntitlementRowModel {
    user_id: String,
    wallet_address: String,
    token_id: Option<String>,
    tier: String,
    status: String,
    #[sqlx(flatten)]
    usage: UsageRowModel,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EntitlementRowModel> for EntitlementRecord {
    type Error = InternalError;

    fn try_from(row: EntitlementRowModel) -> Result<Self, Self::Error> {
        let token_id = match row.token_id {
            Some(token_id) => Some(TokenId::from_str(&token_id).int_err()?),
            None => None,
        };

        Ok(EntitlementRecord {
            user_id: AccountID::try_new(row.user_id).int_err()?,
            wallet_address: WalletAddressConvertor::parse(&row.wallet_address).int_err()?,
            token_id,
            tier: Tier::from_str(&row.tier).int_err()?,
            status: EntitlementStatus::from_str(&row.status).int_err()?,
            usage: row.usage.try_into()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
