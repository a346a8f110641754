use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use agora_types::Timestamp;

/// Source of the wall-clock instant stamped onto every operation.
///
/// The engine itself never reads the system clock; the host supplies a
/// `Clock` at construction. This keeps the state machine deterministic:
/// feeding the same operations with the same timestamps reproduces the same
/// state.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// A clock backed by the operating system's wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Timestamp::from_millis(millis)
    }
}

/// A manually driven clock for tests and embedding.
///
/// Time only moves when the holder advances it, which makes subscription
/// window boundaries exactly testable.
#[derive(Debug)]
pub struct ManualClock {
    now_millis: AtomicU64,
}

impl ManualClock {
    /// Create a manual clock starting at the given instant.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now_millis: AtomicU64::new(start.as_millis()),
        }
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: u64) {
        self.now_millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, instant: Timestamp) {
        self.now_millis.store(instant.as_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now_millis.load(Ordering::SeqCst))
    }
}
