use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use agora_gate::{require_all, AccessRequest, Caller, Capability};
use agora_types::{AccountId, Identity, Timestamp};

use crate::error::{EngineError, Result};

/// One partition of the identity→account index.
///
/// Shards are append-only: an entry, once written, is never removed or
/// overwritten. The orchestrator is the only writer and guarantees identity
/// uniqueness across all shards before inserting; the shard itself does not
/// re-check. Insertion order inside a shard is irrelevant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdentityShard {
    entries: HashMap<Identity, AccountId>,
}

impl IdentityShard {
    /// Create a new empty shard.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Record `identity → account`. Orchestrator-only.
    pub fn add_entry(
        &mut self,
        caller: &Caller,
        identity: Identity,
        account: AccountId,
        now: Timestamp,
    ) -> Result<()> {
        let request = AccessRequest::new(caller, now);
        require_all(&[Capability::Orchestrator], &request)?;
        self.entries.insert(identity, account);
        Ok(())
    }

    /// Returns `true` if the identity is indexed in this shard.
    pub fn exists(&self, identity: &Identity) -> bool {
        self.entries.contains_key(identity)
    }

    /// The account indexed under `identity`.
    pub fn lookup(&self, identity: &Identity) -> Result<AccountId> {
        self.entries
            .get(identity)
            .copied()
            .ok_or(EngineError::IdentityNotFound {
                identity: *identity,
            })
    }

    /// Number of entries in this shard.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the shard holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all `(identity, account)` entries.
    pub fn entries(&self) -> impl Iterator<Item = (&Identity, &AccountId)> {
        self.entries.iter()
    }
}
