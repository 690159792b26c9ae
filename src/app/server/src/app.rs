// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::SocketAddr;
use std::time::Duration;

use dill::{Catalog, CatalogBuilder};
use internal_error::{InternalError, ResultIntoInternal};
use secrecy::ExposeSecret;
use time_source::SystemTimeSourceDefault;
use tokio::time::MissedTickBehavior;
use tollgate_accounts_services::NoFederatedSessionProvider;
use tollgate_adapter_federated::HttpFederatedSessionProvider;
use tollgate_adapter_web3_evm::JsonRpcNftContractReader;
use tollgate_auth_web3::{NonceProtectionMode, SessionCookieCodec, Web3NonceService};

use crate::{Cli, ConfigError, DatabaseConfig, ServerConfig, ServerError, session_cookie_config};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const BINARY_NAME: &str = "tollgate-server";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LOGGING_CONFIG: &str = "info,sqlx=warn";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&cli);

    observability::init::init_logging(config.server.log_format, DEFAULT_LOGGING_CONFIG);
    observability::panic_handler::set_hook_trace_panics(true);

    if config.web3.nonce_cleanup_interval.is_zero() {
        return Err(ConfigError::InvalidValue {
            field: "web3.nonceCleanupInterval",
            reason: "must be positive",
        }
        .into());
    }

    tracing::info!(
        version = VERSION,
        in_memory_stores = config.database.is_none(),
        federated_provider = config.federated.is_some(),
        "Starting gateway"
    );

    let catalog = configure_base_catalog(&config).await?.build();

    if NonceProtectionMode::from(config.web3.nonce_protection) == NonceProtectionMode::Degraded {
        tracing::warn!("Nonce protection is degraded, signed messages can be replayed");
    }

    cleanup_expired_nonces(&catalog).await?;
    let cleanup_task = spawn_nonce_cleanup(catalog.clone(), config.web3.nonce_cleanup_interval);

    let router = tollgate_adapter_http::tollgate_router()
        .layer(observability::axum::http_layer())
        .layer(axum::Extension(catalog));

    let addr = SocketAddr::new(config.server.address, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await.int_err()?;

    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .int_err()?;

    cleanup_task.abort();

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Catalog
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn configure_base_catalog(config: &ServerConfig) -> Result<CatalogBuilder, ServerError> {
    let mut b = CatalogBuilder::new();

    b.add::<SystemTimeSourceDefault>();

    register_config_in_catalog(config, &mut b)?;

    tollgate_accounts_services::register_dependencies(&mut b);
    tollgate_auth_web3_services::register_dependencies(
        &mut b,
        config.web3.nonce_protection.into(),
    );
    tollgate_entitlements_services::register_dependencies(&mut b);

    b.add::<SessionCookieCodec>();
    b.add::<JsonRpcNftContractReader>();

    if config.federated.is_some() {
        b.add::<HttpFederatedSessionProvider>();
    } else {
        b.add::<NoFederatedSessionProvider>();
    }

    match &config.database {
        Some(database) => configure_database_components(&mut b, database).await?,
        None => configure_in_memory_components(&mut b),
    }

    Ok(b)
}

async fn configure_database_components(
    b: &mut CatalogBuilder,
    database: &DatabaseConfig,
) -> Result<(), InternalError> {
    let pg_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(database.url.expose_secret())
        .await
        .int_err()?;

    if database.run_migrations {
        sqlx::migrate!("../../../migrations/postgres")
            .run(&pg_pool)
            .await
            .int_err()?;

        tracing::info!("Database migrations applied");
    }

    b.add_value(pg_pool);

    b.add::<tollgate_accounts_postgres::PostgresAccountRepository>();
    b.add::<tollgate_auth_web3_postgres::PostgresWeb3AuthNonceRepository>();
    b.add::<tollgate_entitlements_postgres::PostgresEntitlementRepository>();

    Ok(())
}

// Public only for tests
pub fn configure_in_memory_components(b: &mut CatalogBuilder) {
    b.add::<tollgate_accounts_inmem::InMemoryAccountRepository>();
    b.add::<tollgate_auth_web3_inmem::InMemoryWeb3AuthNonceRepository>();
    b.add::<tollgate_entitlements_inmem::InMemoryEntitlementRepository>();
}

pub fn register_config_in_catalog(
    config: &ServerConfig,
    b: &mut CatalogBuilder,
) -> Result<(), ConfigError> {
    b.add_value(config.web3_auth_config()?);
    b.add_value(session_cookie_config(&config.session)?);
    b.add_value(config.entitlements_config()?);
    b.add_value(config.evm_rpc_config()?);
    b.add_value(config.tier_guard_config());
    b.add_value(config.http_auth_config());

    if let Some(federated_session_config) = config.federated_session_config() {
        b.add_value(federated_session_config);
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Background tasks
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn cleanup_expired_nonces(catalog: &Catalog) -> Result<(), InternalError> {
    let nonce_service = catalog.get_one::<dyn Web3NonceService>().int_err()?;

    let purged = nonce_service.cleanup_expired_nonces().await?;
    if purged > 0 {
        tracing::info!(purged, "Expired nonces purged");
    }

    Ok(())
}

fn spawn_nonce_cleanup(catalog: Catalog, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // First tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;

            if let Err(err) = cleanup_expired_nonces(&catalog).await {
                tracing::warn!(
                    error = ?err,
                    error_msg = %err.reason(),
                    "Expired nonce cleanup failed"
                );
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Unable to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
}
