use agora_types::{Identity, Timestamp};
use tracing::debug;

use crate::caller::Caller;
use crate::error::GateError;

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// An authorization predicate gating an entity mutation.
///
/// When an operation combines predicates they are evaluated fail-fast in the
/// canonical order `Orchestrator` -> `Owner` -> `ActiveSubscriber`; the first
/// denial aborts the whole operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// The call must originate from the orchestrator itself. Prevents
    /// direct entity mutation by external callers.
    Orchestrator,
    /// The caller's identity must equal the entity's owner.
    Owner,
    /// The owner's most recent subscription window must still cover `now`.
    ActiveSubscriber,
}

impl Capability {
    /// Human-readable name of this predicate.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Owner => "owner",
            Self::ActiveSubscriber => "active-subscriber",
        }
    }

    /// Evaluate this predicate against an access request.
    pub fn check(&self, request: &AccessRequest<'_>) -> Result<(), GateError> {
        match self {
            Self::Orchestrator => {
                if request.caller.is_orchestrator() {
                    Ok(())
                } else {
                    Err(GateError::NotOrchestrator)
                }
            }
            Self::Owner => {
                let owner = request.owner.ok_or(GateError::MissingOwnerContext)?;
                match request.caller.identity() {
                    None => Err(GateError::NoCallerIdentity),
                    Some(identity) if identity == owner => Ok(()),
                    Some(identity) => Err(GateError::NotOwner { caller: *identity }),
                }
            }
            Self::ActiveSubscriber => match request.subscription_expiry {
                None => Err(GateError::NeverSubscribed),
                // The window is half-open: `now == expiry` is already lapsed.
                Some(expiry) if request.now < expiry => Ok(()),
                Some(expiry) => Err(GateError::SubscriptionLapsed { expired_at: expiry }),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// AccessRequest
// ---------------------------------------------------------------------------

/// Everything a capability predicate needs to reach a decision.
///
/// Built by the entity being mutated from its own fields, so the predicate
/// always judges the entity's current state, never a caller-supplied claim.
/// Entities without an owning identity (shards, posts) leave `owner` unset.
#[derive(Clone, Debug)]
pub struct AccessRequest<'a> {
    /// Who is invoking the mutation.
    pub caller: &'a Caller,
    /// The entity's owner identity, if the entity has one.
    pub owner: Option<&'a Identity>,
    /// End of the owner's most recent subscription window, if any.
    pub subscription_expiry: Option<Timestamp>,
    /// The operation's wall-clock instant, stamped by the host clock.
    pub now: Timestamp,
}

impl<'a> AccessRequest<'a> {
    /// Create a request with no owner or subscription context.
    pub fn new(caller: &'a Caller, now: Timestamp) -> Self {
        Self {
            caller,
            owner: None,
            subscription_expiry: None,
            now,
        }
    }

    /// Attach the entity's owner identity.
    pub fn with_owner(mut self, owner: &'a Identity) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Attach the owner's subscription-window expiry.
    pub fn with_subscription_expiry(mut self, expiry: Option<Timestamp>) -> Self {
        self.subscription_expiry = expiry;
        self
    }
}

// ---------------------------------------------------------------------------
// require_all
// ---------------------------------------------------------------------------

/// Evaluate capabilities fail-fast, in the order given.
///
/// Callers list predicates in the canonical order; the first denial wins and
/// no later predicate runs. An empty list always passes.
pub fn require_all(
    capabilities: &[Capability],
    request: &AccessRequest<'_>,
) -> Result<(), GateError> {
    for capability in capabilities {
        if let Err(denial) = capability.check(request) {
            debug!(
                capability = capability.name(),
                caller = %request.caller,
                error = %denial,
                "capability denied"
            );
            return Err(denial);
        }
    }
    Ok(())
}
