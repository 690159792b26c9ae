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
use internal_error::{ErrorIntoInternal, InternalError, ResultIntoInternal};
use sqlx::PgPool;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const ACCOUNT_COLUMNS: &str = r#"
    id,
    display_name,
    email,
    email_verified,
    avatar_url,
    wallet_address,
    provider,
    active_organization_id,
    registered_at,
    updated_at
"#;

const ACCOUNTS_PKEY: &str = "accounts_pkey";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct PostgresAccountRepository {
    pg_pool: PgPool,
}

#[component(pub)]
#[interface(dyn AccountRepository)]
impl PostgresAccountRepository {
    pub fn new(pg_pool: PgPool) -> Self {
        Self { pg_pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create_account(&self, account: &Account) -> Result<(), CreateAccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, display_name, email, email_verified, avatar_url, wallet_address,
                                  provider, active_organization_id, registered_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(account.id.as_ref())
        .bind(&account.display_name)
        .bind(&account.email)
        .bind(account.email_verified)
        .bind(account.avatar_url.as_deref())
        .bind(WalletAddressConvertor::lowercase_string(&account.wallet_address))
        .bind(&account.provider)
        .bind(account.active_organization_id.as_deref())
        .bind(account.registered_at)
        .bind(account.updated_at)
        .execute(&self.pg_pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let account_field = if db_err.constraint() == Some(ACCOUNTS_PKEY) {
                    CreateAccountDuplicateField::Id
                } else {
                    CreateAccountDuplicateField::WalletAddress
                };
                CreateAccountError::Duplicate(CreateAccountErrorDuplicate { account_field })
            }
            _ => CreateAccountError::Internal(e.int_err()),
        })?;

        Ok(())
    }

    async fn get_account_by_id(
        &self,
        account_id: &AccountID,
    ) -> Result<Account, GetAccountByIdError> {
        let maybe_row = sqlx::query_as::<_, AccountRowModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(account_id.as_ref())
        .fetch_optional(&self.pg_pool)
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(GetAccountByIdError::NotFound(AccountNotFoundByIdError {
                account_id: account_id.clone(),
            })),
        }
    }

    async fn find_account_by_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<Account>, FindAccountByWalletError> {
        let maybe_row = sqlx::query_as::<_, AccountRowModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE wallet_address = $1"
        ))
        .bind(WalletAddressConvertor::lowercase_string(wallet))
        .fetch_optional(&self.pg_pool)
        .await
        .int_err()?;

        Ok(maybe_row.map(Account::try_from).transpose()?)
    }

    async fn upsert_wallet_account(
        &self,
        account: &Account,
    ) -> Result<Account, UpsertWalletAccountError> {
        let row = sqlx::query_as::<_, AccountRowModel>(&format!(
            r#"
            INSERT INTO accounts (id, display_name, email, email_verified, avatar_url, wallet_address,
                                  provider, active_organization_id, registered_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (wallet_address) DO UPDATE
                SET updated_at = excluded.updated_at
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id.as_ref())
        .bind(&account.display_name)
        .bind(&account.email)
        .bind(account.email_verified)
        .bind(account.avatar_url.as_deref())
        .bind(WalletAddressConvertor::lowercase_string(&account.wallet_address))
        .bind(&account.provider)
        .bind(account.active_organization_id.as_deref())
        .bind(account.registered_at)
        .bind(account.updated_at)
        .fetch_one(&self.pg_pool)
        .await
        .int_err()?;

        Ok(row.try_into()?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, sqlx::FromRow)]
struct AccountRowModel {
    id: String,
    display_name: String,
    email: String,
    email_verified: bool,
    avatar_url: Option<String>,
    wallet_address: String,
    provider: String,
    active_organization_id: Option<String>,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRowModel> for Account {
    type Error = InternalError;

    fn try_from(row: AccountRowModel) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountID::try_new(row.id).int_err()?,
            display_name: row.display_name,
            email: row.email,
            email_verified: row.email_verified,
            avatar_url: row.avatar_url,
            wallet_address: WalletAddressConvertor::parse(&row.wallet_address).int_err()?,
            provider: row.provider,
            active_organization_id: row.active_organization_id,
            registered_at: row.registered_at,
            updated_at: row.updated_at,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
