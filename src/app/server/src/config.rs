// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use duration_string::DurationString;
use observability::init::LogFormat;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tollgate_accounts::{ParseWalletAddressError, WalletAddressConvertor};
use tollgate_adapter_federated::FederatedSessionConfig;
use tollgate_adapter_http::HttpAuthConfig;
use tollgate_adapter_web3_evm::{DEFAULT_RPC_REQUEST_TIMEOUT_MILLIS, EvmRpcConfig};
use tollgate_auth_web3::{
    DEFAULT_NONCE_TTL_SECONDS,
    DEFAULT_SESSION_COOKIE_NAME,
    DEFAULT_SESSION_TTL_SECONDS,
    MacStrategy,
    NonceProtectionMode,
    Web3AuthConfig,
};
use tollgate_entitlements::{
    DEFAULT_ENTITLEMENT_CACHE_TTL_SECONDS,
    DEFAULT_RPC_BACKOFF_MILLIS,
    DEFAULT_RPC_MAX_ATTEMPTS,
    EntitlementsConfig,
    ParseTokenIdAllowListError,
    TierGuardConfig,
    TokenId,
    TokenIdAllowList,
};

use crate::Cli;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545/";
pub const DEFAULT_NONCE_CLEANUP_INTERVAL_SECONDS: u64 = 10 * 60;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Root of the YAML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfig {
    /// Listener and logging
    pub server: HttpServerConfig,

    /// Postgres connection. Stores are kept in memory when absent.
    pub database: Option<DatabaseConfig>,

    /// Session cookie signing
    pub session: SessionConfig,

    /// Wallet handshake
    pub web3: Web3Config,

    /// ERC-721 gating contract and its RPC endpoint
    pub chain: ChainConfig,

    /// External identity provider. Only wallet sessions exist when absent.
    pub federated: Option<FederatedConfig>,

    /// Guarded operations
    pub guard: GuardConfig,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Server
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HttpServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_HTTP_PORT,
            log_format: LogFormat::default(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Database
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(deserialize_with = "deserialize_secret")]
    pub url: SecretString,

    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "DatabaseConfig::default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn new(url: SecretString) -> Self {
        Self {
            url,
            max_connections: Self::default_max_connections(),
            run_migrations: Self::default_run_migrations(),
        }
    }

    fn default_max_connections() -> u32 {
        10
    }

    fn default_run_migrations() -> bool {
        true
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Session
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Exactly one of `signingKey` and `baseSecret` is expected. An explicit
/// key wins when both are given.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionConfig {
    /// Raw cookie signing key
    #[serde(deserialize_with = "deserialize_optional_secret")]
    pub signing_key: Option<SecretString>,

    /// Secret the cookie signing key is derived from
    #[serde(deserialize_with = "deserialize_optional_secret")]
    pub base_secret: Option<SecretString>,

    pub mac_strategy: MacStrategyConfig,

    #[serde(deserialize_with = "deserialize_duration")]
    pub ttl: Duration,

    pub cookie_name: String,

    /// Only disable for plain-HTTP local development
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            signing_key: None,
            base_secret: None,
            mac_strategy: MacStrategyConfig::default(),
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS.unsigned_abs()),
            cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            cookie_secure: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacStrategyConfig {
    #[default]
    Ring,
    Portable,
}

impl From<MacStrategyConfig> for MacStrategy {
    fn from(value: MacStrategyConfig) -> Self {
        match value {
            MacStrategyConfig::Ring => Self::Ring,
            MacStrategyConfig::Portable => Self::Portable,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Web3
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Web3Config {
    #[serde(deserialize_with = "deserialize_duration")]
    pub nonce_ttl: Duration,

    /// Signed messages must name this chain when set
    pub expected_chain_id: Option<u64>,

    pub nonce_protection: NonceProtectionConfig,

    #[serde(deserialize_with = "deserialize_duration")]
    pub nonce_cleanup_interval: Duration,

    pub sync_entitlements_on_login: bool,
}

impl Default for Web3Config {
    fn default() -> Self {
        Self {
            nonce_ttl: Duration::from_secs(DEFAULT_NONCE_TTL_SECONDS.unsigned_abs()),
            expected_chain_id: None,
            nonce_protection: NonceProtectionConfig::default(),
            nonce_cleanup_interval: Duration::from_secs(DEFAULT_NONCE_CLEANUP_INTERVAL_SECONDS),
            sync_entitlements_on_login: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceProtectionConfig {
    #[default]
    Enforced,
    /// Accepts any nonce. Replay protection is off.
    Degraded,
}

impl From<NonceProtectionConfig> for NonceProtectionMode {
    fn from(value: NonceProtectionConfig) -> Self {
        match value {
            NonceProtectionConfig::Enforced => Self::Enforced,
            NonceProtectionConfig::Degraded => Self::Degraded,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Chain
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChainConfig {
    /// Local development node when unset
    pub rpc_url: Option<url::Url>,

    #[serde(deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,

    /// Entitlement checks fail closed while unset
    pub contract_address: Option<String>,

    /// Inclusive ranges, e.g. `"1-5,9"`
    pub premium_token_ids: String,

    pub enterprise_token_ids: String,

    /// Checked with `ownerOf` for contracts without enumeration
    pub fallback_token_id: Option<u64>,

    #[serde(deserialize_with = "deserialize_duration")]
    pub cache_ttl: Duration,

    pub rpc_max_attempts: u32,

    #[serde(deserialize_with = "deserialize_duration")]
    pub rpc_backoff: Duration,

    pub fetch_metadata: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            request_timeout: Duration::from_millis(DEFAULT_RPC_REQUEST_TIMEOUT_MILLIS),
            contract_address: None,
            premium_token_ids: String::new(),
            enterprise_token_ids: String::new(),
            fallback_token_id: None,
            cache_ttl: Duration::from_secs(DEFAULT_ENTITLEMENT_CACHE_TTL_SECONDS.unsigned_abs()),
            rpc_max_attempts: DEFAULT_RPC_MAX_ATTEMPTS,
            rpc_backoff: Duration::from_millis(DEFAULT_RPC_BACKOFF_MILLIS.unsigned_abs()),
            fetch_metadata: false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Federated
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FederatedConfig {
    /// Provider endpoint returning the session of forwarded credentials
    pub session_url: url::Url,

    #[serde(default, deserialize_with = "deserialize_optional_duration")]
    pub request_timeout: Option<Duration>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Guard
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GuardConfig {
    /// Re-read ownership (cache allowed) before each guarded operation
    pub recheck_ownership: bool,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Loading
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl ServerConfig {
    /// Defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(text)?)
    }

    /// Command line and environment take precedence over the file
    pub fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(address) = cli.address {
            self.server.address = address;
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(log_format) = cli.log_format {
            self.server.log_format = log_format;
        }
        if let Some(database_url) = &cli.database_url {
            let url = SecretString::from(database_url.clone());
            match &mut self.database {
                Some(database) => database.url = url,
                None => self.database = Some(DatabaseConfig::new(url)),
            }
        }
        if let Some(session_secret) = &cli.session_secret {
            self.session.base_secret = Some(SecretString::from(session_secret.clone()));
        }
        if let Some(rpc_url) = &cli.rpc_url {
            self.chain.rpc_url = Some(rpc_url.clone());
        }
        if let Some(session_url) = &cli.federated_session_url {
            match &mut self.federated {
                Some(federated) => federated.session_url = session_url.clone(),
                None => {
                    self.federated = Some(FederatedConfig {
                        session_url: session_url.clone(),
                        request_timeout: None,
                    });
                }
            }
        }
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    // Component configs
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn web3_auth_config(&self) -> Result<Web3AuthConfig, ConfigError> {
        Ok(Web3AuthConfig {
            nonce_ttl: chrono_duration("web3.nonceTtl", self.web3.nonce_ttl)?,
            session_ttl: chrono_duration("session.ttl", self.session.ttl)?,
            expected_chain_id: self.web3.expected_chain_id,
            cookie_name: self.session.cookie_name.clone(),
            cookie_secure: self.session.cookie_secure,
        })
    }

    pub fn entitlements_config(&self) -> Result<EntitlementsConfig, ConfigError> {
        let chain = &self.chain;

        let contract_address = chain
            .contract_address
            .as_deref()
            .map(WalletAddressConvertor::parse)
            .transpose()
            .map_err(ConfigError::InvalidContractAddress)?;

        if chain.rpc_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain.rpcMaxAttempts",
                reason: "at least one attempt is required",
            });
        }

        Ok(EntitlementsConfig {
            contract_address,
            premium_token_ids: token_id_list("chain.premiumTokenIds", &chain.premium_token_ids)?,
            enterprise_token_ids: token_id_list(
                "chain.enterpriseTokenIds",
                &chain.enterprise_token_ids,
            )?,
            fallback_token_id: chain.fallback_token_id.map(TokenId::from),
            cache_ttl: chrono_duration("chain.cacheTtl", chain.cache_ttl)?,
            rpc_max_attempts: chain.rpc_max_attempts,
            rpc_backoff: chrono_duration("chain.rpcBackoff", chain.rpc_backoff)?,
            fetch_metadata: chain.fetch_metadata,
        })
    }

    pub fn evm_rpc_config(&self) -> Result<EvmRpcConfig, ConfigError> {
        let rpc_url = match &self.chain.rpc_url {
            Some(rpc_url) => rpc_url.clone(),
            None => url::Url::parse(DEFAULT_RPC_URL).map_err(|_| ConfigError::InvalidValue {
                field: "chain.rpcUrl",
                reason: "default endpoint is not a valid URL",
            })?,
        };

        Ok(EvmRpcConfig {
            rpc_url,
            request_timeout: self.chain.request_timeout,
        })
    }

    pub fn federated_session_config(&self) -> Option<FederatedSessionConfig> {
        self.federated.as_ref().map(|federated| {
            let mut config = FederatedSessionConfig::new(federated.session_url.clone())
                .with_withheld_cookie(self.session.cookie_name.clone());
            if let Some(request_timeout) = federated.request_timeout {
                config.request_timeout = request_timeout;
            }
            config
        })
    }

    pub fn tier_guard_config(&self) -> TierGuardConfig {
        TierGuardConfig {
            recheck_ownership: self.guard.recheck_ownership,
        }
    }

    pub fn http_auth_config(&self) -> HttpAuthConfig {
        HttpAuthConfig {
            sync_entitlements_on_login: self.web3.sync_entitlements_on_login,
        }
    }
}

fn chrono_duration(field: &'static str, value: Duration) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::from_std(value).map_err(|_| ConfigError::InvalidValue {
        field,
        reason: "duration is out of range",
    })
}

fn token_id_list(field: &'static str, value: &str) -> Result<TokenIdAllowList, ConfigError> {
    TokenIdAllowList::from_str(value).map_err(|source| ConfigError::InvalidTokenIds { field, source })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Serde helpers
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    DurationString::deserialize(deserializer).map(Into::into)
}

fn deserialize_optional_duration<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<DurationString>::deserialize(deserializer)?.map(Into::into))
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

fn deserialize_optional_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file")]
    Parse(#[from] serde_yaml::Error),

    #[error("Either 'session.signingKey' or 'session.baseSecret' must be provided")]
    MissingSessionSecret,

    #[error("Session signing key must be at least {min} bytes, got {actual}")]
    SessionKeyTooShort { min: usize, actual: usize },

    #[error("Invalid 'chain.contractAddress'")]
    InvalidContractAddress(#[source] ParseWalletAddressError),

    #[error("Invalid '{field}'")]
    InvalidTokenIds {
        field: &'static str,
        #[source]
        source: ParseTokenIdAllowListError,
    },

    #[error("Invalid '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
