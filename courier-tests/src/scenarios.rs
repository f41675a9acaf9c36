//! Reusable helpers for Courier integration tests.
//!
//! Builders for brokers on deterministic clocks, shared by every test
//! module in this crate.

use courier_broker::{Broker, BrokerConfig, Clock, Token};

/// Starting instant for manual test clocks.
///
/// An arbitrary nonzero epoch so bugs that treat time zero as "unset"
/// surface in tests.
pub const TEST_EPOCH_US: u64 = 1_700_000_000_000_000;

/// Creates a broker on a manual clock with short test timings.
///
/// Time only moves when a test advances it through [`Broker::clock`],
/// so lease expiry is driven explicitly instead of by sleeping.
///
/// # Panics
///
/// Panics if the test configuration is invalid.
#[must_use]
pub fn manual_broker() -> Broker {
    manual_broker_with(BrokerConfig::for_testing())
}

/// Creates a broker on a manual clock with a custom configuration.
///
/// # Panics
///
/// Panics if `config` is invalid.
#[must_use]
pub fn manual_broker_with(config: BrokerConfig) -> Broker {
    Broker::with_clock(config, Clock::manual(TEST_EPOCH_US)).expect("test config is valid")
}

/// Logs `user` in and returns the session token.
#[must_use]
pub fn session(broker: &Broker, user: &str) -> Token {
    broker.login(user, "test-password")
}
