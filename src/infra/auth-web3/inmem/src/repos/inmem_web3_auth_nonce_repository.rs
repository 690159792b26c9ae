// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dill::*;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryWeb3AuthNonceRepository {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    expires_at_by_nonce: HashMap<Web3AuthEip4361Nonce, DateTime<Utc>>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[component(pub)]
#[interface(dyn Web3AuthNonceRepository)]
#[scope(Singleton)]
impl InMemoryWeb3AuthNonceRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3AuthNonceRepository for InMemoryWeb3AuthNonceRepository {
    async fn set_nonce(&self, entity: &Web3AuthEip4361NonceEntity) -> Result<(), SetNonceError> {
        let mut guard = self.state.lock().unwrap();

        guard
            .expires_at_by_nonce
            .insert(entity.nonce.clone(), entity.expires_at);

        Ok(())
    }

    async fn consume_nonce(
        &self,
        nonce: &Web3AuthEip4361Nonce,
        now: DateTime<Utc>,
    ) -> Result<(), ConsumeNonceError> {
        let mut guard = self.state.lock().unwrap();

        match guard.expires_at_by_nonce.remove(nonce) {
            Some(expires_at) if expires_at > now => Ok(()),
            _ => Err(ConsumeNonceError::NotFound(NonceNotFoundError {
                nonce: nonce.clone(),
            })),
        }
    }

    async fn cleanup_expired_nonces(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, CleanupExpiredNoncesError> {
        let mut guard = self.state.lock().unwrap();

        let before = guard.expires_at_by_nonce.len();
        guard
            .expires_at_by_nonce
            .retain(|_, expires_at| *expires_at > now);

        Ok((before - guard.expires_at_by_nonce.len()) as u64)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
