use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use agora_types::{AccountId, Identity, ShardId};

use crate::error::{EngineError, Result};
use crate::shard::IdentityShard;
use crate::store::{AccountStore, PostStore};

/// The process-wide directory: admin identity, ordered shard list, and the
/// entity stores.
///
/// Bootstrapped with one empty shard and one admin identity; lives for the
/// process lifetime with no teardown. The state is `Clone` so the
/// orchestrator can run each operation against a scratch copy and commit or
/// discard it wholesale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkState {
    admin: Identity,
    shards: Vec<IdentityShard>,
    accounts: AccountStore,
    posts: PostStore,
}

impl NetworkState {
    /// Bootstrap a directory with one empty shard.
    pub fn new(admin: Identity) -> Self {
        Self {
            admin,
            shards: vec![IdentityShard::new()],
            accounts: AccountStore::new(),
            posts: PostStore::new(),
        }
    }

    /// The admin identity recorded at bootstrap.
    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    /// All shards, oldest first.
    pub fn shards(&self) -> &[IdentityShard] {
        &self.shards
    }

    /// The account store.
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// The post store.
    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    pub(crate) fn accounts_mut(&mut self) -> &mut AccountStore {
        &mut self.accounts
    }

    pub(crate) fn posts_mut(&mut self) -> &mut PostStore {
        &mut self.posts
    }

    /// Append a new empty shard; it becomes the open shard.
    pub(crate) fn push_shard(&mut self) -> ShardId {
        self.shards.push(IdentityShard::new());
        ShardId::from_position((self.shards.len() - 1) as u64)
    }

    /// The open shard (the most recently created one) that registrations
    /// target. At least one shard always exists.
    pub(crate) fn open_shard_mut(&mut self) -> &mut IdentityShard {
        self.shards
            .last_mut()
            .expect("directory always holds at least one shard")
    }

    /// Returns `true` if the identity is indexed in any shard.
    pub fn registered(&self, identity: &Identity) -> bool {
        self.shards.iter().any(|shard| shard.exists(identity))
    }

    /// Resolve an identity to its account by scanning shards oldest-first.
    ///
    /// Linear and unindexed, O(number of shards) per lookup. There is no
    /// secondary index; this scan is the system's routing algorithm and its
    /// known scalability bottleneck.
    pub fn resolve(&self, identity: &Identity) -> Result<AccountId> {
        for shard in &self.shards {
            if shard.exists(identity) {
                return shard.lookup(identity);
            }
        }
        Err(EngineError::IdentityNotFound {
            identity: *identity,
        })
    }

    /// Cross-entity integrity sweep.
    ///
    /// Verifies that every shard entry resolves to a live account owned by
    /// the indexed identity, that no identity is indexed twice, and that
    /// every post/reply/like/follow reference resolves with symmetric
    /// reply-parent links.
    pub fn validate(&self) -> Result<()> {
        let mut seen_identities: HashSet<Identity> = HashSet::new();
        let mut indexed_accounts = 0usize;

        for (position, shard) in self.shards.iter().enumerate() {
            for (identity, account_id) in shard.entries() {
                if !seen_identities.insert(*identity) {
                    return Err(EngineError::IntegrityViolation {
                        reason: format!("identity {identity} indexed in more than one shard"),
                    });
                }
                let account = self.accounts.get(account_id).map_err(|_| {
                    EngineError::IntegrityViolation {
                        reason: format!(
                            "shard {position} entry {identity} points at dead account {account_id:?}"
                        ),
                    }
                })?;
                if account.owner() != identity {
                    return Err(EngineError::IntegrityViolation {
                        reason: format!(
                            "shard {position} entry {identity} resolves to an account owned by {}",
                            account.owner()
                        ),
                    });
                }
                indexed_accounts += 1;
            }
        }

        if indexed_accounts != self.accounts.len() {
            return Err(EngineError::IntegrityViolation {
                reason: format!(
                    "{} accounts stored but {indexed_accounts} indexed",
                    self.accounts.len()
                ),
            });
        }

        for (account_id, account) in self.accounts.iter() {
            for post_id in account.posts() {
                let post = self.posts.get(post_id).map_err(|_| {
                    EngineError::IntegrityViolation {
                        reason: format!("account {account_id:?} lists dead post {post_id:?}"),
                    }
                })?;
                if post.author() != *account_id {
                    return Err(EngineError::IntegrityViolation {
                        reason: format!(
                            "post {post_id:?} listed by {account_id:?} but authored by {:?}",
                            post.author()
                        ),
                    });
                }
            }
            for edge in account.following().iter().chain(account.followers()) {
                if !self.accounts.contains(edge) {
                    return Err(EngineError::IntegrityViolation {
                        reason: format!("account {account_id:?} holds dead edge {edge:?}"),
                    });
                }
            }
        }

        for (post_id, post) in self.posts.iter() {
            if !self.accounts.contains(&post.author()) {
                return Err(EngineError::IntegrityViolation {
                    reason: format!("post {post_id:?} authored by dead account"),
                });
            }
            if let Some(parent_id) = post.parent() {
                let parent = self.posts.get(&parent_id).map_err(|_| {
                    EngineError::IntegrityViolation {
                        reason: format!("post {post_id:?} replies to dead post {parent_id:?}"),
                    }
                })?;
                if !parent.replies().contains(post_id) {
                    return Err(EngineError::IntegrityViolation {
                        reason: format!(
                            "post {post_id:?} has parent {parent_id:?} but is missing from its reply list"
                        ),
                    });
                }
            }
            for reply_id in post.replies() {
                let reply = self.posts.get(reply_id).map_err(|_| {
                    EngineError::IntegrityViolation {
                        reason: format!("post {post_id:?} lists dead reply {reply_id:?}"),
                    }
                })?;
                if reply.parent() != Some(*post_id) {
                    return Err(EngineError::IntegrityViolation {
                        reason: format!(
                            "reply {reply_id:?} listed under {post_id:?} but parented elsewhere"
                        ),
                    });
                }
            }
            for liker in post.likes() {
                if !self.accounts.contains(liker) {
                    return Err(EngineError::IntegrityViolation {
                        reason: format!("post {post_id:?} liked by dead account {liker:?}"),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use agora_gate::Caller;
    use agora_types::Timestamp;

    fn admin() -> Identity {
        Identity::from_token("admin")
    }

    #[test]
    fn bootstrap_seeds_one_shard() {
        let state = NetworkState::new(admin());
        assert_eq!(state.shards().len(), 1);
        assert_eq!(state.admin(), &admin());
        assert!(state.accounts().is_empty());
        assert!(state.posts().is_empty());
    }

    #[test]
    fn push_shard_returns_positions() {
        let mut state = NetworkState::new(admin());
        assert_eq!(state.push_shard(), ShardId::from_position(1));
        assert_eq!(state.push_shard(), ShardId::from_position(2));
        assert_eq!(state.shards().len(), 3);
    }

    #[test]
    fn resolve_scans_oldest_first() {
        let mut state = NetworkState::new(admin());
        let identity = Identity::from_token("alice");
        let account = state
            .accounts_mut()
            .insert(Account::new(identity, "new user"));
        state
            .open_shard_mut()
            .add_entry(&Caller::Orchestrator, identity, account, Timestamp::zero())
            .unwrap();
        state.push_shard();

        // Entry lives in the first shard; the scan still finds it.
        assert_eq!(state.resolve(&identity).unwrap(), account);
        assert!(state.registered(&identity));
    }

    #[test]
    fn resolve_unregistered_fails() {
        let state = NetworkState::new(admin());
        let identity = Identity::from_token("ghost");
        assert_eq!(
            state.resolve(&identity),
            Err(EngineError::IdentityNotFound { identity })
        );
    }

    #[test]
    fn validate_accepts_fresh_state() {
        let state = NetworkState::new(admin());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn validate_catches_unindexed_account() {
        let mut state = NetworkState::new(admin());
        // An account inserted without a shard entry is unreachable.
        state
            .accounts_mut()
            .insert(Account::new(Identity::from_token("orphan"), "new user"));
        assert!(matches!(
            state.validate(),
            Err(EngineError::IntegrityViolation { .. })
        ));
    }

    #[test]
    fn validate_catches_shard_entry_to_dead_account() {
        let mut state = NetworkState::new(admin());
        let identity = Identity::from_token("alice");
        state
            .open_shard_mut()
            .add_entry(
                &Caller::Orchestrator,
                identity,
                agora_types::AccountId::new(),
                Timestamp::zero(),
            )
            .unwrap();
        assert!(matches!(
            state.validate(),
            Err(EngineError::IntegrityViolation { .. })
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let mut state = NetworkState::new(admin());
        let identity = Identity::from_token("alice");
        let account = state
            .accounts_mut()
            .insert(Account::new(identity, "new user"));
        state
            .open_shard_mut()
            .add_entry(&Caller::Orchestrator, identity, account, Timestamp::zero())
            .unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let parsed: NetworkState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.resolve(&identity).unwrap(), account);
        assert!(parsed.validate().is_ok());
    }
}
