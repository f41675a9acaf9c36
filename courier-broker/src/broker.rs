//! The broker facade.
//!
//! `Broker` is the one context object a caller holds: it owns the
//! token registry, the topic store, the offset tracker, and the queue
//! store, and threads its clock and configuration into every call.
//! Each operation resolves the caller's token first, dispatches to the
//! owning store, and surfaces failures as [`BrokerError`].

use std::sync::Arc;

use bytes::Bytes;
use courier_auth::TokenRegistry;
use courier_core::{Message, MessageId, Offset, PartitionIndex, Token, UserId};
use courier_progress::{GroupKey, OffsetTracker};
use courier_queue::{QueueMessage, QueueStore, QueueSummary};
use courier_topic::{TopicStore, TopicSummary};
use tracing::info;

use crate::clock::Clock;
use crate::config::BrokerConfig;
use crate::error::{BrokerError, BrokerResult};
use crate::sweeper::SweeperHandle;

/// The message broker: topics, queues, consumer progress, and sessions
/// behind a single token-checked surface.
#[derive(Debug)]
pub struct Broker {
    /// Session tokens.
    auth: TokenRegistry,
    /// Topics and their partition logs.
    topics: TopicStore,
    /// Consumer-group committed offsets.
    progress: OffsetTracker,
    /// Queues. Shared with the sweeper task.
    queues: Arc<QueueStore>,
    /// Time source threaded into every store call.
    clock: Clock,
    /// Immutable configuration.
    config: BrokerConfig,
}

impl Broker {
    /// Creates a broker on the system clock.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn new(config: BrokerConfig) -> BrokerResult<Self> {
        Self::with_clock(config, Clock::system())
    }

    /// Creates a broker with an explicit clock.
    ///
    /// Tests pass [`Clock::manual`] here to drive lease expiry without
    /// sleeping.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn with_clock(config: BrokerConfig, clock: Clock) -> BrokerResult<Self> {
        config.validate()?;
        info!(
            lease_ttl_us = config.lease_ttl_us,
            sweep_interval_us = config.sweep_interval_us,
            "Broker initialized"
        );
        Ok(Self {
            auth: TokenRegistry::new(),
            topics: TopicStore::new(config.limits),
            progress: OffsetTracker::new(),
            queues: Arc::new(QueueStore::new(config.limits)),
            clock,
            config,
        })
    }

    /// The broker's configuration.
    #[must_use]
    pub const fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// The broker's clock.
    #[must_use]
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Spawns the background lease sweeper on the current tokio
    /// runtime. The broker works without it (reclamation is lazy);
    /// see [`SweeperHandle`].
    #[must_use]
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        SweeperHandle::spawn(
            Arc::clone(&self.queues),
            self.clock.clone(),
            self.config.sweep_interval_us,
        )
    }

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    /// Logs a user in, issuing a session token.
    ///
    /// There is no credential store: any password is accepted and the
    /// token is simply bound to `user`. Logging in again yields a new
    /// token without invalidating earlier ones.
    pub fn login(&self, user: &str, _password: &str) -> Token {
        self.auth.login(user)
    }

    // -------------------------------------------------------------------------
    // Topics
    // -------------------------------------------------------------------------

    /// Creates a topic with `partitions` partitions.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `Conflict`, `InvalidArgument`, or
    /// `LimitExceeded` (see [`BrokerError::kind`]).
    pub fn create_topic(
        &self,
        token: &Token,
        name: &str,
        partitions: u32,
    ) -> BrokerResult<TopicSummary> {
        let user = self.resolve(token)?;
        Ok(self.topics.create(name, partitions, user)?)
    }

    /// Lists all topics, sorted by name.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for an unknown token.
    pub fn list_topics(&self, token: &Token) -> BrokerResult<Vec<TopicSummary>> {
        self.resolve(token)?;
        Ok(self.topics.list())
    }

    /// Deletes a topic and every consumer-group offset referencing it.
    /// Only the topic's creator may delete it.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `NotFound`, or `Forbidden`.
    pub fn delete_topic(&self, token: &Token, name: &str) -> BrokerResult<()> {
        let user = self.resolve(token)?;
        self.topics.delete(name, &user)?;
        self.progress.drop_topic(name);
        Ok(())
    }

    /// Publishes a message, returning the chosen partition and the
    /// assigned offset.
    ///
    /// An explicit `partition` pins the message; otherwise a key routes
    /// it by hash and an unkeyed message lands on partition 0.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `NotFound`, or `LimitExceeded`.
    pub fn publish(
        &self,
        token: &Token,
        topic: &str,
        partition: Option<PartitionIndex>,
        key: Option<&str>,
        payload: impl Into<Bytes>,
    ) -> BrokerResult<(PartitionIndex, Offset)> {
        let user = self.resolve(token)?;
        let mut message = Message::new(payload, user);
        if let Some(key) = key {
            message = message.with_key(key);
        }
        Ok(self
            .topics
            .publish(topic, partition, message, self.clock.now_us())?)
    }

    /// Reads up to `max` messages for a consumer group, starting at the
    /// group's committed offset.
    ///
    /// Pulling never advances the group: the same messages come back
    /// until the group commits. An empty result means the group has
    /// caught up. `max` is capped at `Limits::max_pull_messages`.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `NotFound`, or `InvalidArgument` for an empty
    /// group name.
    #[allow(clippy::cast_possible_truncation)] // Sizes bounded by limits.
    pub fn pull(
        &self,
        token: &Token,
        topic: &str,
        partition: PartitionIndex,
        group: &str,
        max: usize,
    ) -> BrokerResult<Vec<Message>> {
        self.resolve(token)?;
        Self::ensure_group_name(group)?;
        let cap = self.config.limits.max_pull_messages as usize;
        let from = self.progress.committed(&GroupKey::new(topic, group, partition));
        Ok(self.topics.read(topic, partition, from, max.min(cap))?)
    }

    /// Commits a consumer group's next offset to read on a partition.
    ///
    /// Last-write-wins; committing a lower offset rewinds the group.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `NotFound` for a missing topic or partition, or
    /// `InvalidArgument` for an empty group name.
    pub fn commit_offset(
        &self,
        token: &Token,
        topic: &str,
        group: &str,
        partition: PartitionIndex,
        offset: Offset,
    ) -> BrokerResult<()> {
        self.resolve(token)?;
        Self::ensure_group_name(group)?;
        self.topics.ensure_partition(topic, partition)?;
        self.progress
            .commit(GroupKey::new(topic, group, partition), offset);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queues
    // -------------------------------------------------------------------------

    /// Creates a queue.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `Conflict`, `InvalidArgument`, or
    /// `LimitExceeded`.
    pub fn create_queue(&self, token: &Token, name: &str) -> BrokerResult<QueueSummary> {
        let user = self.resolve(token)?;
        Ok(self.queues.create(name, user)?)
    }

    /// Lists all queues, sorted by name, with visible/leased counts as
    /// of now.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for an unknown token.
    pub fn list_queues(&self, token: &Token) -> BrokerResult<Vec<QueueSummary>> {
        self.resolve(token)?;
        Ok(self.queues.list(self.clock.now_us()))
    }

    /// Deletes a queue and all of its messages. Only the queue's
    /// creator may delete it.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `NotFound`, or `Forbidden`.
    pub fn delete_queue(&self, token: &Token, name: &str) -> BrokerResult<()> {
        let user = self.resolve(token)?;
        Ok(self.queues.delete(name, &user)?)
    }

    /// Appends a message at the tail of a queue, returning its id.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `NotFound`, or `LimitExceeded`.
    pub fn enqueue(
        &self,
        token: &Token,
        queue: &str,
        payload: impl Into<Bytes>,
    ) -> BrokerResult<MessageId> {
        let user = self.resolve(token)?;
        Ok(self
            .queues
            .enqueue(queue, payload, user, self.clock.now_us())?)
    }

    /// Delivers the oldest visible message, leased for the configured
    /// TTL. `None` means nothing is deliverable right now.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `NotFound` for a missing queue.
    pub fn dequeue(&self, token: &Token, queue: &str) -> BrokerResult<Option<QueueMessage>> {
        self.resolve(token)?;
        Ok(self
            .queues
            .dequeue(queue, self.clock.now_us(), self.config.lease_ttl_us)?)
    }

    /// Permanently settles a delivered message.
    ///
    /// Succeeds while the id is still present, including after its
    /// lease expired, as long as nothing removed it.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `NotFound` once the id is gone.
    pub fn ack(&self, token: &Token, queue: &str, id: MessageId) -> BrokerResult<()> {
        self.resolve(token)?;
        Ok(self.queues.ack(queue, id)?)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn resolve(&self, token: &Token) -> BrokerResult<UserId> {
        Ok(self.auth.resolve(token)?)
    }

    fn ensure_group_name(group: &str) -> BrokerResult<()> {
        if group.is_empty() {
            return Err(BrokerError::InvalidArgument {
                name: "group",
                reason: "consumer group name must not be empty",
            });
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use courier_core::Limits;

    fn broker() -> (Broker, Clock) {
        let clock = Clock::manual(0);
        let broker = Broker::with_clock(BrokerConfig::for_testing(), clock.clone()).unwrap();
        (broker, clock)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Broker::new(BrokerConfig::new().with_lease_ttl_us(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_unknown_token_is_unauthorized() {
        let (broker, _) = broker();
        let bogus = Token::new("bogus");

        let err = broker.list_topics(&bogus).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = broker.create_topic(&bogus, "orders", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = broker.dequeue(&bogus, "jobs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_topic_lifecycle() {
        let (broker, _) = broker();
        let alice = broker.login("alice", "pw");

        let summary = broker.create_topic(&alice, "orders", 3).unwrap();
        assert_eq!(summary.partitions, 3);

        let err = broker.create_topic(&alice, "orders", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        assert_eq!(broker.list_topics(&alice).unwrap().len(), 1);

        let bob = broker.login("bob", "pw");
        let err = broker.delete_topic(&bob, "orders").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        broker.delete_topic(&alice, "orders").unwrap();
        assert!(broker.list_topics(&alice).unwrap().is_empty());

        let err = broker.delete_topic(&alice, "orders").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_publish_pull_commit_cycle() {
        let (broker, _) = broker();
        let alice = broker.login("alice", "pw");
        broker.create_topic(&alice, "orders", 1).unwrap();

        for i in 0..3 {
            let (partition, offset) = broker
                .publish(&alice, "orders", None, None, format!("m{i}").into_bytes())
                .unwrap();
            assert_eq!(partition, PartitionIndex::new(0));
            assert_eq!(offset, Offset::new(i));
        }

        // First pull starts at 0 and does not advance the group.
        let batch = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "g1", 10)
            .unwrap();
        assert_eq!(batch.len(), 3);
        let again = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "g1", 10)
            .unwrap();
        assert_eq!(again.len(), 3);

        // Committing moves the group past what it processed.
        broker
            .commit_offset(&alice, "orders", "g1", PartitionIndex::new(0), Offset::new(3))
            .unwrap();
        let caught_up = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "g1", 10)
            .unwrap();
        assert!(caught_up.is_empty());

        // Another group is unaffected.
        let fresh = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "g2", 10)
            .unwrap();
        assert_eq!(fresh.len(), 3);
    }

    #[test]
    fn test_publish_records_producer() {
        let (broker, _) = broker();
        let alice = broker.login("alice", "pw");
        broker.create_topic(&alice, "orders", 1).unwrap();
        broker
            .publish(&alice, "orders", None, None, b"hello".to_vec())
            .unwrap();

        let batch = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "g1", 1)
            .unwrap();
        assert_eq!(batch[0].producer, UserId::new("alice"));
    }

    #[test]
    fn test_pull_caps_batch_size() {
        let clock = Clock::manual(0);
        let limits = Limits {
            max_pull_messages: 2,
            ..Limits::new()
        };
        let config = BrokerConfig::for_testing().with_limits(limits);
        let broker = Broker::with_clock(config, clock).unwrap();
        let alice = broker.login("alice", "pw");
        broker.create_topic(&alice, "orders", 1).unwrap();
        for i in 0..5 {
            broker
                .publish(&alice, "orders", None, None, format!("m{i}").into_bytes())
                .unwrap();
        }

        let batch = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "g1", 100)
            .unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_empty_group_name_rejected() {
        let (broker, _) = broker();
        let alice = broker.login("alice", "pw");
        broker.create_topic(&alice, "orders", 1).unwrap();

        let err = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "", 10)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = broker
            .commit_offset(&alice, "orders", "", PartitionIndex::new(0), Offset::new(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_commit_validates_topic_and_partition() {
        let (broker, _) = broker();
        let alice = broker.login("alice", "pw");
        broker.create_topic(&alice, "orders", 2).unwrap();

        let err = broker
            .commit_offset(&alice, "ghost", "g1", PartitionIndex::new(0), Offset::new(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = broker
            .commit_offset(&alice, "orders", "g1", PartitionIndex::new(9), Offset::new(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_topic_clears_group_offsets() {
        let (broker, _) = broker();
        let alice = broker.login("alice", "pw");
        broker.create_topic(&alice, "orders", 1).unwrap();
        broker
            .publish(&alice, "orders", None, None, b"old".to_vec())
            .unwrap();
        broker
            .commit_offset(&alice, "orders", "g1", PartitionIndex::new(0), Offset::new(1))
            .unwrap();

        broker.delete_topic(&alice, "orders").unwrap();
        broker.create_topic(&alice, "orders", 1).unwrap();
        broker
            .publish(&alice, "orders", None, None, b"new".to_vec())
            .unwrap();

        // g1 starts from 0 on the recreated topic.
        let batch = broker
            .pull(&alice, "orders", PartitionIndex::new(0), "g1", 10)
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].payload.as_ref(), b"new");
    }

    #[test]
    fn test_queue_lifecycle_with_lease_expiry() {
        let (broker, clock) = broker();
        let ttl = broker.config().lease_ttl_us;
        let alice = broker.login("alice", "pw");
        broker.create_queue(&alice, "jobs").unwrap();

        let id = broker.enqueue(&alice, "jobs", b"job".to_vec()).unwrap();

        let msg = broker.dequeue(&alice, "jobs").unwrap().unwrap();
        assert_eq!(msg.id, id);
        assert_eq!(msg.delivery_count, 1);

        // Still leased just before the deadline.
        clock.advance_us(ttl - 1);
        assert!(broker.dequeue(&alice, "jobs").unwrap().is_none());

        // At the deadline it comes back, same id.
        clock.advance_us(1);
        let redelivered = broker.dequeue(&alice, "jobs").unwrap().unwrap();
        assert_eq!(redelivered.id, id);
        assert_eq!(redelivered.delivery_count, 2);

        broker.ack(&alice, "jobs", id).unwrap();
        clock.advance_us(ttl * 2);
        assert!(broker.dequeue(&alice, "jobs").unwrap().is_none());

        let err = broker.ack(&alice, "jobs", id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_queue_delete_authorization() {
        let (broker, _) = broker();
        let alice = broker.login("alice", "pw");
        let bob = broker.login("bob", "pw");
        broker.create_queue(&alice, "jobs").unwrap();

        let err = broker.delete_queue(&bob, "jobs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        broker.delete_queue(&alice, "jobs").unwrap();
        assert!(broker.list_queues(&alice).unwrap().is_empty());
    }

    #[test]
    fn test_list_queues_reflects_clock() {
        let (broker, clock) = broker();
        let ttl = broker.config().lease_ttl_us;
        let alice = broker.login("alice", "pw");
        broker.create_queue(&alice, "jobs").unwrap();
        broker.enqueue(&alice, "jobs", b"job".to_vec()).unwrap();
        broker.dequeue(&alice, "jobs").unwrap();

        let queues = broker.list_queues(&alice).unwrap();
        assert_eq!((queues[0].visible, queues[0].leased), (0, 1));

        clock.advance_us(ttl);
        let queues = broker.list_queues(&alice).unwrap();
        assert_eq!((queues[0].visible, queues[0].leased), (1, 0));
    }

    #[test]
    fn test_sessions_are_independent() {
        let (broker, _) = broker();
        let first = broker.login("alice", "pw");
        let second = broker.login("alice", "other-password");
        assert_ne!(first, second);

        // Both tokens act as alice.
        broker.create_topic(&first, "orders", 1).unwrap();
        broker.delete_topic(&second, "orders").unwrap();
    }
}
