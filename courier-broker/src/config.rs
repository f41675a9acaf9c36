//! Broker configuration.

use courier_core::{Error, Limits, Result};

/// Default lease TTL: 30 seconds.
pub const DEFAULT_LEASE_TTL_US: u64 = 30_000_000;

/// Default sweep interval: 5 seconds.
pub const DEFAULT_SWEEP_INTERVAL_US: u64 = 5_000_000;

/// Broker-wide configuration.
///
/// Constructed once and handed to [`crate::Broker::new`]; nothing here
/// changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerConfig {
    /// How long a dequeued message stays leased before it becomes
    /// visible again (microseconds).
    pub lease_ttl_us: u64,
    /// How often the background sweeper reclaims expired leases
    /// (microseconds).
    pub sweep_interval_us: u64,
    /// Resource limits shared by all stores.
    pub limits: Limits,
}

impl BrokerConfig {
    /// Production defaults: 30s lease TTL, 5s sweep interval.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lease_ttl_us: DEFAULT_LEASE_TTL_US,
            sweep_interval_us: DEFAULT_SWEEP_INTERVAL_US,
            limits: Limits::new(),
        }
    }

    /// Short timings for tests: 1s lease TTL, 50ms sweep interval.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            lease_ttl_us: 1_000_000,
            sweep_interval_us: 50_000,
            limits: Limits::new(),
        }
    }

    /// Builder: set the lease TTL in microseconds.
    #[must_use]
    pub const fn with_lease_ttl_us(mut self, lease_ttl_us: u64) -> Self {
        self.lease_ttl_us = lease_ttl_us;
        self
    }

    /// Builder: set the sweep interval in microseconds.
    #[must_use]
    pub const fn with_sweep_interval_us(mut self, sweep_interval_us: u64) -> Self {
        self.sweep_interval_us = sweep_interval_us;
        self
    }

    /// Builder: set the resource limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a timing is zero, or the limits'
    /// own validation error.
    pub fn validate(&self) -> Result<()> {
        if self.lease_ttl_us == 0 {
            return Err(Error::InvalidArgument {
                name: "lease_ttl_us",
                reason: "must be positive",
            });
        }
        if self.sweep_interval_us == 0 {
            return Err(Error::InvalidArgument {
                name: "sweep_interval_us",
                reason: "must be positive",
            });
        }
        self.limits.validate()
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self::new()
    }
}
