//! Foundation types for Agora.
//!
//! This crate provides the identity, id, and temporal primitives used
//! throughout the Agora social-network state machine. Every other Agora
//! crate depends on `agora-types`.
//!
//! # Key Types
//!
//! - [`Identity`] — Authenticated caller token, an opaque BLAKE3 digest
//! - [`AccountId`] / [`PostId`] — UUID v7 store-relative entity identifiers
//! - [`ShardId`] — Position of an identity-index shard in the directory
//! - [`Timestamp`] — Epoch-milliseconds wall-clock instant

pub mod error;
pub mod identity;
pub mod refs;
pub mod time;

pub use error::TypeError;
pub use identity::Identity;
pub use refs::{AccountId, PostId, ShardId};
pub use time::Timestamp;
