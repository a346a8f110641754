use serde::{Deserialize, Serialize};

use agora_gate::{require_all, AccessRequest, Caller, Capability};
use agora_types::{AccountId, Identity, PostId, Timestamp};

use crate::error::{EngineError, Result};

/// Per-identity aggregate: profile, social edges, posts, subscription log.
///
/// The owner is set exactly once at creation and never changes. All
/// sequences are append-only. `following` and `followers` carry no dedup
/// guarantee; the two sides of a follow edge are maintained independently
/// by the orchestrator. `posts` is oldest-first internally and addressed
/// newest-first through [`Account::post_by_recency`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    owner: Identity,
    display_name: String,
    following: Vec<AccountId>,
    followers: Vec<AccountId>,
    posts: Vec<PostId>,
    subscriptions: Vec<Timestamp>,
}

impl Account {
    /// Create an account owned by `owner` with the platform default name.
    pub fn new(owner: Identity, display_name: impl Into<String>) -> Self {
        Self {
            owner,
            display_name: display_name.into(),
            following: Vec::new(),
            followers: Vec::new(),
            posts: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    // -- read side ----------------------------------------------------------

    /// The owning identity. Immutable for the account's lifetime.
    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    /// The current display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Accounts this account follows, in follow order.
    pub fn following(&self) -> &[AccountId] {
        &self.following
    }

    /// Accounts following this account, in arrival order.
    pub fn followers(&self) -> &[AccountId] {
        &self.followers
    }

    /// This account's posts, oldest first.
    pub fn posts(&self) -> &[PostId] {
        &self.posts
    }

    /// Subscription purchase instants, oldest first.
    pub fn subscriptions(&self) -> &[Timestamp] {
        &self.subscriptions
    }

    /// End of the most recent subscription window, if any was ever opened.
    pub fn subscription_expiry(&self, window_millis: u64) -> Option<Timestamp> {
        self.subscriptions
            .last()
            .map(|start| start.plus_millis(window_millis))
    }

    /// Returns `true` if `now` falls inside the active subscription window.
    pub fn has_active_subscription(&self, now: Timestamp, window_millis: u64) -> bool {
        self.subscription_expiry(window_millis)
            .map(|expiry| now < expiry)
            .unwrap_or(false)
    }

    /// The post at recency position `index`: 0 is the most recent.
    pub fn post_by_recency(&self, index: usize) -> Result<PostId> {
        let len = self.posts.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        Ok(self.posts[len - 1 - index])
    }

    /// The follower at position `index`, in arrival order.
    pub fn follower_at(&self, index: usize) -> Result<AccountId> {
        self.followers
            .get(index)
            .copied()
            .ok_or(EngineError::IndexOutOfRange {
                index,
                len: self.followers.len(),
            })
    }

    // -- write side ---------------------------------------------------------

    /// Overwrite the display name. Owner-only.
    pub fn rename(&mut self, caller: &Caller, name: impl Into<String>, now: Timestamp) -> Result<()> {
        let request = AccessRequest::new(caller, now).with_owner(&self.owner);
        require_all(&[Capability::Owner], &request)?;
        self.display_name = name.into();
        Ok(())
    }

    /// Append a post reference. Owner-only, and the owner must hold an
    /// active subscription at `now`.
    pub fn add_post(
        &mut self,
        caller: &Caller,
        post: PostId,
        now: Timestamp,
        window_millis: u64,
    ) -> Result<()> {
        let request = AccessRequest::new(caller, now)
            .with_owner(&self.owner)
            .with_subscription_expiry(self.subscription_expiry(window_millis));
        require_all(&[Capability::Owner, Capability::ActiveSubscriber], &request)?;
        self.posts.push(post);
        Ok(())
    }

    /// Append to `following`. Owner-only. Duplicates are not suppressed.
    pub fn follow(&mut self, caller: &Caller, target: AccountId, now: Timestamp) -> Result<()> {
        let request = AccessRequest::new(caller, now).with_owner(&self.owner);
        require_all(&[Capability::Owner], &request)?;
        self.following.push(target);
        Ok(())
    }

    /// Append to `followers`. Orchestrator-only; the follower's own
    /// `following` side is maintained separately.
    pub fn add_follower(
        &mut self,
        caller: &Caller,
        follower: AccountId,
        now: Timestamp,
    ) -> Result<()> {
        let request = AccessRequest::new(caller, now);
        require_all(&[Capability::Orchestrator], &request)?;
        self.followers.push(follower);
        Ok(())
    }

    /// Open a new subscription window starting at `now`. Owner-only.
    ///
    /// Fails while the previous window is still active; the new window
    /// starts at `now`, not at the end of the old one.
    pub fn add_subscription(
        &mut self,
        caller: &Caller,
        now: Timestamp,
        window_millis: u64,
    ) -> Result<()> {
        let request = AccessRequest::new(caller, now).with_owner(&self.owner);
        require_all(&[Capability::Owner], &request)?;
        if let Some(expiry) = self.subscription_expiry(window_millis) {
            if now < expiry {
                return Err(EngineError::AlreadySubscribed {
                    active_until: expiry,
                });
            }
        }
        self.subscriptions.push(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_gate::GateError;

    const WINDOW: u64 = 1_000;

    fn owner() -> Identity {
        Identity::from_token("owner")
    }

    fn account() -> Account {
        Account::new(owner(), "new user")
    }

    fn as_owner() -> Caller {
        Caller::External(owner())
    }

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    // -----------------------------------------------------------------------
    // Creation and rename
    // -----------------------------------------------------------------------

    #[test]
    fn new_account_has_defaults() {
        let account = account();
        assert_eq!(account.owner(), &owner());
        assert_eq!(account.display_name(), "new user");
        assert!(account.posts().is_empty());
        assert!(account.following().is_empty());
        assert!(account.followers().is_empty());
        assert!(account.subscriptions().is_empty());
    }

    #[test]
    fn rename_by_owner() {
        let mut account = account();
        account.rename(&as_owner(), "ada", at(0)).unwrap();
        assert_eq!(account.display_name(), "ada");
    }

    #[test]
    fn rename_by_stranger_is_denied() {
        let mut account = account();
        let stranger = Identity::from_token("stranger");
        let err = account
            .rename(&Caller::External(stranger), "mallory", at(0))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Unauthorized(GateError::NotOwner { caller: stranger })
        );
        assert_eq!(account.display_name(), "new user");
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    #[test]
    fn subscription_opens_window() {
        let mut account = account();
        account.add_subscription(&as_owner(), at(100), WINDOW).unwrap();
        assert!(account.has_active_subscription(at(100), WINDOW));
        assert!(account.has_active_subscription(at(1_099), WINDOW));
        assert!(!account.has_active_subscription(at(1_100), WINDOW));
        assert_eq!(account.subscription_expiry(WINDOW), Some(at(1_100)));
    }

    #[test]
    fn double_subscribe_in_active_window_fails() {
        let mut account = account();
        account.add_subscription(&as_owner(), at(100), WINDOW).unwrap();
        let err = account
            .add_subscription(&as_owner(), at(500), WINDOW)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::AlreadySubscribed {
                active_until: at(1_100)
            }
        );
        assert_eq!(account.subscriptions().len(), 1);
    }

    #[test]
    fn resubscribe_at_exact_expiry_succeeds() {
        let mut account = account();
        account.add_subscription(&as_owner(), at(100), WINDOW).unwrap();
        account
            .add_subscription(&as_owner(), at(1_100), WINDOW)
            .unwrap();
        // The new window starts at the purchase instant.
        assert_eq!(account.subscription_expiry(WINDOW), Some(at(2_100)));
    }

    #[test]
    fn subscribe_by_stranger_is_denied() {
        let mut account = account();
        let stranger = Caller::External(Identity::from_token("stranger"));
        assert!(account.add_subscription(&stranger, at(0), WINDOW).is_err());
        assert!(account.subscriptions().is_empty());
    }

    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    #[test]
    fn add_post_requires_active_subscription() {
        let mut account = account();
        let err = account
            .add_post(&as_owner(), PostId::new(), at(0), WINDOW)
            .unwrap_err();
        assert_eq!(err, EngineError::Unauthorized(GateError::NeverSubscribed));
    }

    #[test]
    fn add_post_inside_window() {
        let mut account = account();
        account.add_subscription(&as_owner(), at(0), WINDOW).unwrap();
        let post = PostId::new();
        account.add_post(&as_owner(), post, at(500), WINDOW).unwrap();
        assert_eq!(account.posts(), &[post]);
    }

    #[test]
    fn add_post_after_window_is_denied() {
        let mut account = account();
        account.add_subscription(&as_owner(), at(0), WINDOW).unwrap();
        let err = account
            .add_post(&as_owner(), PostId::new(), at(WINDOW), WINDOW)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Unauthorized(GateError::SubscriptionLapsed {
                expired_at: at(WINDOW)
            })
        );
        assert!(account.posts().is_empty());
    }

    #[test]
    fn post_by_recency_addresses_newest_first() {
        let mut account = account();
        account.add_subscription(&as_owner(), at(0), WINDOW).unwrap();
        let first = PostId::new();
        let second = PostId::new();
        account.add_post(&as_owner(), first, at(1), WINDOW).unwrap();
        account.add_post(&as_owner(), second, at(2), WINDOW).unwrap();

        assert_eq!(account.post_by_recency(0).unwrap(), second);
        assert_eq!(account.post_by_recency(1).unwrap(), first);
        assert_eq!(
            account.post_by_recency(2),
            Err(EngineError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    // -----------------------------------------------------------------------
    // Social edges
    // -----------------------------------------------------------------------

    #[test]
    fn follow_appends_without_dedup() {
        let mut account = account();
        let target = AccountId::new();
        account.follow(&as_owner(), target, at(0)).unwrap();
        account.follow(&as_owner(), target, at(1)).unwrap();
        // Duplicate edges are recorded as-is.
        assert_eq!(account.following(), &[target, target]);
    }

    #[test]
    fn add_follower_is_orchestrator_only() {
        let mut account = account();
        let follower = AccountId::new();

        let err = account
            .add_follower(&as_owner(), follower, at(0))
            .unwrap_err();
        assert_eq!(err, EngineError::Unauthorized(GateError::NotOrchestrator));

        account
            .add_follower(&Caller::Orchestrator, follower, at(0))
            .unwrap();
        assert_eq!(account.followers(), &[follower]);
        assert_eq!(account.follower_at(0).unwrap(), follower);
        assert_eq!(
            account.follower_at(1),
            Err(EngineError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn serde_roundtrip() {
        let mut account = account();
        account.add_subscription(&as_owner(), at(5), WINDOW).unwrap();
        let json = serde_json::to_string(&account).unwrap();
        let parsed: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(account, parsed);
    }
}
