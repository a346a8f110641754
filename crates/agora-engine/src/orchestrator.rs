use std::sync::Arc;

use tracing::{debug, info};

use agora_gate::{require_all, AccessRequest, Caller, Capability};
use agora_types::{AccountId, Identity, PostId, ShardId, Timestamp};

use crate::account::Account;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::post::Post;
use crate::state::NetworkState;

/// Entry point for every external operation.
///
/// The orchestrator owns the network state, routes identities to shards,
/// enforces the capability gate, and sequences multi-entity operations.
/// Every mutating operation is a single atomic unit: it runs against a
/// scratch copy of the state which replaces the live state only on success,
/// so a failure anywhere in the call graph leaves no partial effect.
pub struct Orchestrator {
    state: NetworkState,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl Orchestrator {
    /// Bootstrap an orchestrator with one empty shard and the given admin.
    pub fn new(admin: Identity, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            state: NetworkState::new(admin),
            clock,
            config,
        }
    }

    /// Convenience constructor: system clock, default configuration.
    pub fn with_system_clock(admin: Identity) -> Self {
        Self::new(admin, Arc::new(SystemClock), EngineConfig::default())
    }

    /// Run one operation atomically: mutate a scratch copy of the state and
    /// commit it wholesale, or discard it on any error.
    fn transact<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut NetworkState, Timestamp, &EngineConfig) -> Result<T>,
    ) -> Result<T> {
        let now = self.clock.now();
        let config = self.config.clone();
        let mut scratch = self.state.clone();
        match f(&mut scratch, now, &config) {
            Ok(value) => {
                self.state = scratch;
                debug!(op, %now, "operation committed");
                Ok(value)
            }
            Err(error) => {
                debug!(op, %now, error = %error, "operation rolled back");
                Err(error)
            }
        }
    }

    // -- mutations ----------------------------------------------------------

    /// Append a new empty shard; it becomes the open shard that future
    /// registrations target. Admin-only. There is no automatic split
    /// policy; this call is the only growth path.
    pub fn create_shard(&mut self, caller: &Identity) -> Result<ShardId> {
        let identity = *caller;
        self.transact("create_shard", move |state, now, _config| {
            // The directory is owned by the admin identity.
            let caller = Caller::External(identity);
            let request = AccessRequest::new(&caller, now).with_owner(state.admin());
            require_all(&[Capability::Owner], &request)?;

            let id = state.push_shard();
            info!(shard = %id, "shard created");
            Ok(id)
        })
    }

    /// Register the caller: create an account and index it in the open
    /// shard. Fails if the identity is already indexed in any shard.
    pub fn register(&mut self, caller: &Identity) -> Result<AccountId> {
        let identity = *caller;
        self.transact("register", move |state, now, config| {
            if state.registered(&identity) {
                return Err(EngineError::AlreadyExists { identity });
            }
            let account = Account::new(identity, config.default_display_name.clone());
            let account_id = state.accounts_mut().insert(account);
            state
                .open_shard_mut()
                .add_entry(&Caller::Orchestrator, identity, account_id, now)?;
            info!(identity = %identity, account = %account_id, "identity registered");
            Ok(account_id)
        })
    }

    /// Open a new subscription window for the caller's account.
    pub fn subscribe(&mut self, caller: &Identity) -> Result<()> {
        let identity = *caller;
        self.transact("subscribe", move |state, now, config| {
            let account_id = state.resolve(&identity)?;
            let caller = Caller::External(identity);
            state.accounts_mut().get_mut(&account_id)?.add_subscription(
                &caller,
                now,
                config.subscription_window_millis,
            )
        })
    }

    /// Publish a top-level post. The author must hold an active
    /// subscription; that check lives in the account, not here.
    pub fn post(&mut self, caller: &Identity, content: impl Into<String>) -> Result<PostId> {
        let identity = *caller;
        let content = content.into();
        self.transact("post", move |state, now, config| {
            let author = state.resolve(&identity)?;
            let post_id = state.posts_mut().insert(Post::new(author, content));
            let caller = Caller::External(identity);
            state.accounts_mut().get_mut(&author)?.add_post(
                &caller,
                post_id,
                now,
                config.subscription_window_millis,
            )?;
            debug!(author = %author, post = %post_id, "post published");
            Ok(post_id)
        })
    }

    /// Publish a reply to `target` and link it into the target's reply
    /// list. Returns the new reply's id.
    pub fn reply(
        &mut self,
        caller: &Identity,
        target: PostId,
        content: impl Into<String>,
    ) -> Result<PostId> {
        let identity = *caller;
        let content = content.into();
        self.transact("reply", move |state, now, config| {
            let author = state.resolve(&identity)?;
            if !state.posts().contains(&target) {
                return Err(EngineError::PostNotFound { post: target });
            }
            let reply_id = state
                .posts_mut()
                .insert(Post::new_reply(author, content, target));
            let caller = Caller::External(identity);
            state.accounts_mut().get_mut(&author)?.add_post(
                &caller,
                reply_id,
                now,
                config.subscription_window_millis,
            )?;
            state
                .posts_mut()
                .get_mut(&target)?
                .add_reply(&Caller::Orchestrator, reply_id, now)?;
            debug!(author = %author, parent = %target, reply = %reply_id, "reply published");
            Ok(reply_id)
        })
    }

    /// Record a like from the caller's account on `target`. Any registered
    /// identity may like; the post suppresses duplicates.
    pub fn like(&mut self, caller: &Identity, target: PostId) -> Result<()> {
        let identity = *caller;
        self.transact("like", move |state, now, _config| {
            let account_id = state.resolve(&identity)?;
            state
                .posts_mut()
                .get_mut(&target)?
                .add_like(&Caller::Orchestrator, account_id, now)
        })
    }

    /// Follow `target`: append to the caller's `following` and the
    /// target's `followers` in one atomic operation. The two sides are
    /// maintained independently; no dedup on either.
    pub fn follow(&mut self, caller: &Identity, target: &Identity) -> Result<()> {
        let identity = *caller;
        let target = *target;
        self.transact("follow", move |state, now, _config| {
            let follower_id = state.resolve(&identity)?;
            let target_id = state.resolve(&target)?;
            let caller = Caller::External(identity);
            state
                .accounts_mut()
                .get_mut(&follower_id)?
                .follow(&caller, target_id, now)?;
            state
                .accounts_mut()
                .get_mut(&target_id)?
                .add_follower(&Caller::Orchestrator, follower_id, now)?;
            Ok(())
        })
    }

    /// Rename the caller's account.
    pub fn set_name(&mut self, caller: &Identity, name: impl Into<String>) -> Result<()> {
        let identity = *caller;
        let name = name.into();
        self.transact("set_name", move |state, now, _config| {
            let account_id = state.resolve(&identity)?;
            let caller = Caller::External(identity);
            state
                .accounts_mut()
                .get_mut(&account_id)?
                .rename(&caller, name, now)
        })
    }

    // -- lookups ------------------------------------------------------------

    /// Resolve an identity to its account id.
    pub fn get_account(&self, identity: &Identity) -> Result<AccountId> {
        self.state.resolve(identity)
    }

    /// The identity behind follower `index` of `identity`'s account.
    pub fn get_follower(&self, identity: &Identity, index: usize) -> Result<Identity> {
        let account_id = self.state.resolve(identity)?;
        let follower_id = self.state.accounts().get(&account_id)?.follower_at(index)?;
        Ok(*self.state.accounts().get(&follower_id)?.owner())
    }

    /// The reply at position `index` of `post`, oldest first.
    pub fn get_reply(&self, post: PostId, index: usize) -> Result<PostId> {
        self.state.posts().get(&post)?.reply_at(index)
    }

    /// The post at recency position `index` of `identity`'s account;
    /// 0 is the most recent.
    pub fn get_post(&self, identity: &Identity, index: usize) -> Result<PostId> {
        let account_id = self.state.resolve(identity)?;
        self.state.accounts().get(&account_id)?.post_by_recency(index)
    }

    /// The admin identity recorded at bootstrap.
    pub fn get_admin(&self) -> Identity {
        *self.state.admin()
    }

    // -- embedding accessors ------------------------------------------------

    /// Borrow the account record named by `id`.
    pub fn account(&self, id: &AccountId) -> Result<&Account> {
        self.state.accounts().get(id)
    }

    /// Borrow the post record named by `id`.
    pub fn post_record(&self, id: &PostId) -> Result<&Post> {
        self.state.posts().get(id)
    }

    /// Number of shards in the directory.
    pub fn shard_count(&self) -> usize {
        self.state.shards().len()
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.state.accounts().len()
    }

    /// Number of posts ever published.
    pub fn post_count(&self) -> usize {
        self.state.posts().len()
    }

    /// Borrow the full network state.
    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the cross-entity integrity sweep on the live state.
    pub fn validate(&self) -> Result<()> {
        self.state.validate()
    }
}
