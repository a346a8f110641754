//! Capability gate for the Agora engine.
//!
//! Every entity mutation in Agora is guarded by one or more capability
//! predicates, evaluated fail-fast in a fixed order before any state is
//! touched. The gate takes the caller as an explicit argument — there is no
//! ambient call context — so authorization decisions are pure functions of
//! the caller, the entity's owner, and the operation timestamp.
//!
//! # Quick Start
//!
//! ```rust
//! use agora_gate::{require_all, AccessRequest, Caller, Capability};
//! use agora_types::{Identity, Timestamp};
//!
//! let owner = Identity::from_token("alice");
//! let caller = Caller::External(owner);
//! let request = AccessRequest::new(&caller, Timestamp::from_millis(1_000)).with_owner(&owner);
//! assert!(require_all(&[Capability::Owner], &request).is_ok());
//! ```

pub mod caller;
pub mod capability;
pub mod error;

// Re-exports for convenience.
pub use caller::Caller;
pub use capability::{require_all, AccessRequest, Capability};
pub use error::GateError;
