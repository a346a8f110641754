//! The Agora network engine: shards, accounts, posts, and the orchestrator.
//!
//! The engine owns the in-memory network state and exposes every operation
//! through [`Orchestrator`]. Identities are routed to accounts through an
//! ordered list of identity-index shards; accounts and posts live in
//! id-keyed stores and reference each other by store-relative ids only.
//! Mutating operations run against a scratch copy of the state and commit
//! atomically, so a mid-operation failure never leaves a partial effect.
//!
//! # Key Types
//!
//! - [`Orchestrator`] — Entry point for all operations, mutating and read
//! - [`NetworkState`] — Admin identity, shard directory, entity stores
//! - [`IdentityShard`] — One identity-to-account index segment
//! - [`Account`] / [`Post`] — The two entity records
//! - [`Clock`] — Time source abstraction, [`ManualClock`] for tests
//! - [`EngineConfig`] — Subscription window length and platform defaults

pub mod account;
pub mod clock;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod post;
pub mod shard;
pub mod state;
pub mod store;

pub use account::Account;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, DEFAULT_SUBSCRIPTION_WINDOW_MILLIS};
pub use error::{EngineError, Result};
pub use orchestrator::Orchestrator;
pub use post::Post;
pub use shard::IdentityShard;
pub use state::NetworkState;
pub use store::{AccountStore, PostStore};
