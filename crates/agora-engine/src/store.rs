use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use agora_types::{AccountId, PostId};

use crate::account::Account;
use crate::error::{EngineError, Result};
use crate::post::Post;

/// Id-keyed account records.
///
/// The store is the entity factory: inserting a record allocates a fresh
/// time-ordered id, and every cross-entity reference in the system is one of
/// these store-relative ids. Records are never removed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountStore {
    records: HashMap<AccountId, Account>,
}

impl AccountStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Allocate an id for `account` and store it.
    pub fn insert(&mut self, account: Account) -> AccountId {
        let id = AccountId::new();
        self.records.insert(id, account);
        id
    }

    /// Borrow the account named by `id`.
    pub fn get(&self, id: &AccountId) -> Result<&Account> {
        self.records
            .get(id)
            .ok_or(EngineError::AccountNotFound { account: *id })
    }

    /// Mutably borrow the account named by `id`.
    pub fn get_mut(&mut self, id: &AccountId) -> Result<&mut Account> {
        self.records
            .get_mut(id)
            .ok_or(EngineError::AccountNotFound { account: *id })
    }

    /// Returns `true` if `id` names a live record.
    pub fn contains(&self, id: &AccountId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of accounts stored.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all `(id, account)` records.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.records.iter()
    }
}

/// Id-keyed post records. Same factory discipline as [`AccountStore`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PostStore {
    records: HashMap<PostId, Post>,
}

impl PostStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Allocate an id for `post` and store it.
    pub fn insert(&mut self, post: Post) -> PostId {
        let id = PostId::new();
        self.records.insert(id, post);
        id
    }

    /// Borrow the post named by `id`.
    pub fn get(&self, id: &PostId) -> Result<&Post> {
        self.records
            .get(id)
            .ok_or(EngineError::PostNotFound { post: *id })
    }

    /// Mutably borrow the post named by `id`.
    pub fn get_mut(&mut self, id: &PostId) -> Result<&mut Post> {
        self.records
            .get_mut(id)
            .ok_or(EngineError::PostNotFound { post: *id })
    }

    /// Returns `true` if `id` names a live record.
    pub fn contains(&self, id: &PostId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of posts stored.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all `(id, post)` records.
    pub fn iter(&self) -> impl Iterator<Item = (&PostId, &Post)> {
        self.records.iter()
    }
}
