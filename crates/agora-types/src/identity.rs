use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Authenticated caller identity.
///
/// An `Identity` is derived deterministically from the opaque token the host
/// platform hands the engine with every operation, using BLAKE3. The same
/// token always produces the same identity; the engine never sees or stores
/// the raw token. Identities are the only authentication primitive in Agora
/// — verification happened upstream before the call reached us.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    digest: [u8; 32],
}

impl Identity {
    /// Derive an `Identity` from a platform-supplied caller token.
    pub fn from_token(token: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"agora-identity-v1:");
        hasher.update(token.as_bytes());
        Self {
            digest: *hasher.finalize().as_bytes(),
        }
    }

    /// Create an ephemeral (random) identity for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self { digest: bytes }
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("id:{}", hex::encode(&self.digest[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `id:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("id:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { digest: arr })
    }

    /// Create from a raw 32-byte digest. Use `from_token()` for production code.
    pub fn from_raw(digest: [u8; 32]) -> Self {
        Self { digest }
    }
}

// Human-readable formats serialize as hex strings so identities can key
// JSON maps; binary formats keep the raw 32 bytes.
impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.digest.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            Ok(Self::from_raw(<[u8; 32]>::deserialize(deserializer)?))
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.short_id())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
