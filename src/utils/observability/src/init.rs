// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = UnknownLogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(UnknownLogFormatError {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Unknown log format '{value}', expected 'text' or 'json'")]
pub struct UnknownLogFormatError {
    pub value: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Installs the global subscriber writing to STDERR.
///
/// `RUST_LOG` takes precedence over `default_filter`. Does nothing when a
/// subscriber is already set, e.g. under tests.
pub fn init_logging(format: LogFormat, default_filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let res = match format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Json => builder
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .try_init(),
    };

    if let Err(err) = res {
        eprintln!("Failed to initialize logging: {err}");
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
