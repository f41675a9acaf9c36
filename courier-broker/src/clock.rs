//! Time source for the broker.
//!
//! Stores take time as an explicit `now_us` parameter; the facade is
//! where that value comes from. In production it is the wall clock. In
//! tests a manual clock lets lease expiry be driven deterministically,
//! without sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Microsecond clock, either the system clock or a manually driven one.
///
/// Clones of a manual clock share the same time.
#[derive(Debug, Clone)]
pub enum Clock {
    /// Wall-clock microseconds since the Unix epoch.
    System,
    /// Manually driven time for tests.
    Manual(Arc<AtomicU64>),
}

impl Clock {
    /// The system clock.
    #[must_use]
    pub const fn system() -> Self {
        Self::System
    }

    /// A manual clock starting at `start_us`.
    #[must_use]
    pub fn manual(start_us: u64) -> Self {
        Self::Manual(Arc::new(AtomicU64::new(start_us)))
    }

    /// Current time in microseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Won't overflow u64 for centuries.
    pub fn now_us(&self) -> u64 {
        match self {
            Self::System => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_micros() as u64),
            Self::Manual(time) => time.load(Ordering::SeqCst),
        }
    }

    /// Advances a manual clock by `delta_us`.
    ///
    /// # Panics
    ///
    /// Panics on a system clock; only manual clocks can be driven.
    pub fn advance_us(&self, delta_us: u64) {
        match self {
            Self::System => panic!("cannot advance the system clock"),
            Self::Manual(time) => {
                time.fetch_add(delta_us, Ordering::SeqCst);
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::System
    }
}
