use agora_gate::GateError;
use agora_types::{AccountId, Identity, PostId, Timestamp};

/// Errors produced by engine operations.
///
/// Any error aborts the enclosing operation with zero observable state
/// change; the orchestrator's transaction wrapper discards all mutations
/// made before the failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A capability predicate denied the caller.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] GateError),

    /// The identity is not registered in any shard.
    #[error("identity {identity} is not registered")]
    IdentityNotFound { identity: Identity },

    /// The account id does not name a live account record.
    #[error("account {account} not found")]
    AccountNotFound { account: AccountId },

    /// The post id does not name a live post record.
    #[error("post {post} not found")]
    PostNotFound { post: PostId },

    /// The identity is already registered.
    #[error("identity {identity} is already registered")]
    AlreadyExists { identity: Identity },

    /// A subscription window is still active.
    #[error("subscription already active until {active_until}")]
    AlreadySubscribed { active_until: Timestamp },

    /// The account already appears in the post's like set.
    #[error("account {account} already liked this post")]
    AlreadyLiked { account: AccountId },

    /// A positional lookup ran past the end of a sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A cross-entity consistency rule does not hold.
    #[error("integrity violation: {reason}")]
    IntegrityViolation { reason: String },
}

/// A specialized `Result` for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
