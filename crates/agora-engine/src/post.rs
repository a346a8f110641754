use serde::{Deserialize, Serialize};

use agora_gate::{require_all, AccessRequest, Caller, Capability};
use agora_types::{AccountId, PostId, Timestamp};

use crate::error::{EngineError, Result};

/// A content node: author, optional parent, replies, likes.
///
/// Author, parent, and content are set once at creation; only `replies` and
/// `likes` grow afterwards, and only through the orchestrator. There is no
/// edit, unlike, or delete operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    author: AccountId,
    parent: Option<PostId>,
    content: String,
    replies: Vec<PostId>,
    likes: Vec<AccountId>,
}

impl Post {
    /// Create a top-level post.
    pub fn new(author: AccountId, content: impl Into<String>) -> Self {
        Self {
            author,
            parent: None,
            content: content.into(),
            replies: Vec::new(),
            likes: Vec::new(),
        }
    }

    /// Create a reply to `parent`.
    pub fn new_reply(author: AccountId, content: impl Into<String>, parent: PostId) -> Self {
        Self {
            author,
            parent: Some(parent),
            content: content.into(),
            replies: Vec::new(),
            likes: Vec::new(),
        }
    }

    // -- read side ----------------------------------------------------------

    /// The authoring account. Immutable.
    pub fn author(&self) -> AccountId {
        self.author
    }

    /// The parent post, if this is a reply.
    pub fn parent(&self) -> Option<PostId> {
        self.parent
    }

    /// The post body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replies to this post, oldest first.
    pub fn replies(&self) -> &[PostId] {
        &self.replies
    }

    /// Accounts that liked this post, in arrival order, duplicate-free.
    pub fn likes(&self) -> &[AccountId] {
        &self.likes
    }

    /// The reply at position `index`, oldest first.
    pub fn reply_at(&self, index: usize) -> Result<PostId> {
        self.replies
            .get(index)
            .copied()
            .ok_or(EngineError::IndexOutOfRange {
                index,
                len: self.replies.len(),
            })
    }

    // -- write side ---------------------------------------------------------

    /// Append a reply reference. Orchestrator-only.
    pub fn add_reply(&mut self, caller: &Caller, child: PostId, now: Timestamp) -> Result<()> {
        let request = AccessRequest::new(caller, now);
        require_all(&[Capability::Orchestrator], &request)?;
        self.replies.push(child);
        Ok(())
    }

    /// Record a like from `account`. Orchestrator-only.
    ///
    /// The duplicate scan runs to completion before the append; the like
    /// set is never observed mid-mutation.
    pub fn add_like(&mut self, caller: &Caller, account: AccountId, now: Timestamp) -> Result<()> {
        let request = AccessRequest::new(caller, now);
        require_all(&[Capability::Orchestrator], &request)?;
        if self.likes.iter().any(|liker| *liker == account) {
            return Err(EngineError::AlreadyLiked { account });
        }
        self.likes.push(account);
        Ok(())
    }
}
