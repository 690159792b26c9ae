// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use headers::HeaderMapExt;
use internal_error::{InternalError, ResultIntoInternal};
use tollgate_accounts::{FederatedSessionProvider, NormalizedSession};

use crate::FederatedSessionConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Asks the identity provider for the session behind the caller's
/// credentials. Only `Authorization` and the cookies not withheld by
/// [`FederatedSessionConfig::withheld_cookies`] are forwarded.
pub struct HttpFederatedSessionProvider {
    client: reqwest::Client,
    config: Arc<FederatedSessionConfig>,
}

#[dill::component(pub)]
#[dill::interface(dyn FederatedSessionProvider)]
#[dill::scope(dill::Singleton)]
impl HttpFederatedSessionProvider {
    pub fn new(config: Arc<FederatedSessionConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl HttpFederatedSessionProvider {
    fn forwarded_credentials(&self, headers: &http::HeaderMap) -> http::HeaderMap {
        let mut forwarded = http::HeaderMap::new();

        for value in headers.get_all(http::header::AUTHORIZATION) {
            forwarded.append(http::header::AUTHORIZATION, value.clone());
        }

        if let Some(cookies) = headers.typed_get::<headers::Cookie>() {
            let kept = cookies
                .iter()
                .filter(|(name, _)| !self.is_withheld(name))
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");

            if !kept.is_empty() {
                match http::HeaderValue::from_str(&kept) {
                    Ok(value) => {
                        forwarded.insert(http::header::COOKIE, value);
                    }
                    Err(_) => tracing::debug!("Dropping cookies not representable as a header"),
                }
            }
        }

        forwarded
    }

    fn is_withheld(&self, cookie_name: &str) -> bool {
        self.config
            .withheld_cookies
            .iter()
            .any(|withheld| withheld == cookie_name)
    }
}

#[async_trait::async_trait]
impl FederatedSessionProvider for HttpFederatedSessionProvider {
    #[tracing::instrument(level = "debug", skip_all)]
    async fn get_session(
        &self,
        headers: &http::HeaderMap,
    ) -> Result<Option<NormalizedSession>, InternalError> {
        let forwarded = self.forwarded_credentials(headers);
        if forwarded.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.config.session_url.clone())
            .timeout(self.config.request_timeout)
            .headers(forwarded)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context_int_err("federated session request failed")?;

        match response.status() {
            http::StatusCode::UNAUTHORIZED | http::StatusCode::FORBIDDEN => {
                tracing::debug!(status = %response.status(), "Provider rejected credentials");
                return Ok(None);
            }
            status if !status.is_success() => {
                return InternalError::bail(format!(
                    "federated session endpoint responded with {status}"
                ));
            }
            _ => {}
        }

        let session: Option<NormalizedSession> = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context_int_err("federated session response is not a session")?;

        Ok(session)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
