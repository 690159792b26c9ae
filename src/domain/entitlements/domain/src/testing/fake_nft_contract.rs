// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use tollgate_accounts::WalletAddress;

use crate::{ChainReadError, NftContractReader, TokenId};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    owners: BTreeMap<TokenId, WalletAddress>,
    token_uris: HashMap<TokenId, String>,
    balance_overrides: HashMap<WalletAddress, TokenId>,
    enumerable: bool,
    queued_failures: VecDeque<ChainReadError>,
    calls: Vec<&'static str>,
}

/// Scriptable in-memory ERC-721 contract.
///
/// Queued failures are returned by the next calls regardless of method.
#[derive(Clone)]
pub struct FakeNftContract {
    state: Arc<Mutex<State>>,
}

impl FakeNftContract {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                enumerable: true,
                ..State::default()
            })),
        }
    }

    /// Contract without the enumeration extension
    pub fn without_enumeration() -> Self {
        let fake = Self::new();
        fake.state.lock().unwrap().enumerable = false;
        fake
    }

    pub fn mint(&self, owner: WalletAddress, token_id: u64) -> &Self {
        self.state
            .lock()
            .unwrap()
            .owners
            .insert(TokenId::from(token_id), owner);
        self
    }

    pub fn transfer(&self, token_id: u64, to: WalletAddress) -> &Self {
        self.mint(to, token_id)
    }

    pub fn set_token_uri(&self, token_id: u64, uri: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .token_uris
            .insert(TokenId::from(token_id), uri.to_string());
        self
    }

    /// Reports a balance that disagrees with the ownership table
    pub fn override_balance(&self, owner: WalletAddress, balance: u64) -> &Self {
        self.state
            .lock()
            .unwrap()
            .balance_overrides
            .insert(owner, TokenId::from(balance));
        self
    }

    pub fn fail_next(&self, times: usize, error: ChainReadError) -> &Self {
        let mut state = self.state.lock().unwrap();
        for _ in 0..times {
            state.queued_failures.push_back(error.clone());
        }
        drop(state);
        self
    }

    /// Methods called so far, in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    fn begin_call(&self, method: &'static str) -> Result<MutexGuard<'_, State>, ChainReadError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method);

        match state.queued_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl NftContractReader for FakeNftContract {
    async fn balance_of(
        &self,
        _contract: &WalletAddress,
        owner: &WalletAddress,
    ) -> Result<TokenId, ChainReadError> {
        let state = self.begin_call("balanceOf")?;

        if let Some(balance) = state.balance_overrides.get(owner) {
            return Ok(*balance);
        }

        let owned = state.owners.values().filter(|o| *o == owner).count();
        Ok(TokenId::from(owned as u64))
    }

    async fn token_of_owner_by_index(
        &self,
        _contract: &WalletAddress,
        owner: &WalletAddress,
        index: u64,
    ) -> Result<TokenId, ChainReadError> {
        const METHOD: &str = "tokenOfOwnerByIndex";
        let state = self.begin_call(METHOD)?;

        if !state.enumerable {
            return Err(ChainReadError::Reverted { method: METHOD });
        }

        usize::try_from(index)
            .ok()
            .and_then(|index| {
                state
                    .owners
                    .iter()
                    .filter(|(_, o)| *o == owner)
                    .nth(index)
                    .map(|(token_id, _)| *token_id)
            })
            .ok_or(ChainReadError::Reverted { method: METHOD })
    }

    async fn owner_of(
        &self,
        _contract: &WalletAddress,
        token_id: TokenId,
    ) -> Result<WalletAddress, ChainReadError> {
        const METHOD: &str = "ownerOf";
        let state = self.begin_call(METHOD)?;

        state
            .owners
            .get(&token_id)
            .copied()
            .ok_or(ChainReadError::Reverted { method: METHOD })
    }

    async fn token_uri(
        &self,
        _contract: &WalletAddress,
        token_id: TokenId,
    ) -> Result<String, ChainReadError> {
        const METHOD: &str = "tokenURI";
        let state = self.begin_call(METHOD)?;

        state
            .token_uris
            .get(&token_id)
            .cloned()
            .ok_or(ChainReadError::Reverted { method: METHOD })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
