use agora_types::{Identity, Timestamp};

/// Errors produced when a capability predicate denies a caller.
///
/// Every variant renders as a `capability denied` message; the engine wraps
/// the whole enum as its `Unauthorized` error kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The operation may only be invoked by the orchestrator itself.
    #[error("capability denied: operation is restricted to the orchestrator")]
    NotOrchestrator,

    /// The caller is not the owner of the entity being mutated.
    #[error("capability denied: caller {caller} is not the entity owner")]
    NotOwner { caller: Identity },

    /// An owner-equality check was attempted without an external caller.
    #[error("capability denied: owner check requires an external caller")]
    NoCallerIdentity,

    /// An owner-equality check was attempted on an entity with no owner.
    #[error("capability denied: owner check requires an owning entity")]
    MissingOwnerContext,

    /// The owner has never purchased a subscription.
    #[error("capability denied: no subscription on record")]
    NeverSubscribed,

    /// The owner's most recent subscription window has ended.
    #[error("capability denied: subscription window ended at {expired_at}")]
    SubscriptionLapsed { expired_at: Timestamp },
}
