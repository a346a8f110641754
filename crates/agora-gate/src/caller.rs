use std::fmt;

use serde::{Deserialize, Serialize};

use agora_types::Identity;

/// Who is invoking an entity mutation.
///
/// External operations enter the engine with an authenticated [`Identity`];
/// the orchestrator re-enters entities under its own ambient authority when
/// it sequences composite operations (appending a reply to a target post,
/// recording a follower on the target account). Entity mutators take a
/// `Caller` explicitly so no mutation path can skip classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caller {
    /// The orchestrator acting on its own authority.
    Orchestrator,
    /// An authenticated external caller.
    External(Identity),
}

impl Caller {
    /// Returns `true` if this call originates from the orchestrator.
    pub fn is_orchestrator(&self) -> bool {
        matches!(self, Self::Orchestrator)
    }

    /// The external caller's identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Orchestrator => None,
            Self::External(identity) => Some(identity),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orchestrator => write!(f, "orchestrator"),
            Self::External(identity) => write!(f, "{identity}"),
        }
    }
}
