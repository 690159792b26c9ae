// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::IpAddr;
use std::path::PathBuf;

use observability::init::LogFormat;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Every flag overrides the matching value of the config file
#[derive(Debug, clap::Parser)]
#[command(name = crate::BINARY_NAME, version = crate::VERSION, about)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long, short, env = "TOLLGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "TOLLGATE_ADDRESS")]
    pub address: Option<IpAddr>,

    /// Port to listen on
    #[arg(long, env = "TOLLGATE_PORT")]
    pub port: Option<u16>,

    /// Log output format: `text` or `json`
    #[arg(long, env = "TOLLGATE_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Postgres connection string, stores are kept in memory otherwise
    #[arg(long, env = "TOLLGATE_DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Base secret the session cookie key is derived from
    #[arg(long, env = "TOLLGATE_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Chain JSON-RPC endpoint
    #[arg(long, env = "TOLLGATE_RPC_URL")]
    pub rpc_url: Option<url::Url>,

    /// Session endpoint of the federated identity provider
    #[arg(long, env = "TOLLGATE_FEDERATED_SESSION_URL")]
    pub federated_session_url: Option<url::Url>,
}
