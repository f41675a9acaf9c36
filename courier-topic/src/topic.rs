//! Topic registry: named topics, each a fixed set of partition logs.
//!
//! The store owns every topic in the broker. Lookups take a read lock
//! on the registry map and clone the topic's `Arc`, so appends and
//! reads on different topics (or different partitions of one topic)
//! never contend with each other.

#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use courier_core::{Limits, Message, Offset, PartitionIndex, UserId};
use tracing::{debug, info};

use crate::error::{TopicError, TopicResult};
use crate::log::PartitionLog;
use crate::router::partition_for_key;

// -----------------------------------------------------------------------------
// Topic
// -----------------------------------------------------------------------------

/// A named topic with a fixed number of partitions.
///
/// The partition count is set at creation and never changes, so
/// key-based routing stays stable for the topic's lifetime.
#[derive(Debug)]
pub struct Topic {
    /// Topic name, unique within the store.
    name: String,
    /// Identity that created the topic. Only the creator may delete it.
    creator: UserId,
    /// One log per partition, indexed by partition number.
    logs: Vec<Mutex<PartitionLog>>,
}

impl Topic {
    fn new(name: String, partitions: u32, creator: UserId) -> Self {
        assert!(partitions > 0, "topic must have at least one partition");
        let logs = (0..partitions).map(|_| Mutex::new(PartitionLog::new())).collect();
        Self { name, creator, logs }
    }

    /// The topic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identity that created this topic.
    #[must_use]
    pub const fn creator(&self) -> &UserId {
        &self.creator
    }

    /// Number of partitions.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn partition_count(&self) -> u32 {
        self.logs.len() as u32
    }

    /// Snapshot of the topic's metadata, including each partition's
    /// end offset.
    ///
    /// # Panics
    ///
    /// Panics if a partition log mutex is poisoned.
    #[must_use]
    pub fn summary(&self) -> TopicSummary {
        let end_offsets = self
            .logs
            .iter()
            .map(|log| log.lock().expect("partition log lock poisoned").end_offset())
            .collect();
        TopicSummary {
            name: self.name.clone(),
            partitions: self.partition_count(),
            creator: self.creator.clone(),
            end_offsets,
        }
    }

    fn log(&self, partition: PartitionIndex) -> TopicResult<&Mutex<PartitionLog>> {
        let index = usize::try_from(partition.get()).map_err(|_| TopicError::PartitionNotFound {
            topic: self.name.clone(),
            partition,
        })?;
        self.logs.get(index).ok_or_else(|| TopicError::PartitionNotFound {
            topic: self.name.clone(),
            partition,
        })
    }

    /// Appends a message to one partition, returning the assigned offset.
    ///
    /// # Errors
    ///
    /// Returns `PartitionNotFound` if the partition index is out of range.
    ///
    /// # Panics
    ///
    /// Panics if the partition log mutex is poisoned.
    pub fn append(
        &self,
        partition: PartitionIndex,
        message: Message,
        now_us: u64,
    ) -> TopicResult<Offset> {
        let mut log = self.log(partition)?.lock().expect("partition log lock poisoned");
        Ok(log.append(message, now_us))
    }

    /// Reads up to `max` messages from one partition starting at `from`.
    ///
    /// # Errors
    ///
    /// Returns `PartitionNotFound` if the partition index is out of range.
    ///
    /// # Panics
    ///
    /// Panics if the partition log mutex is poisoned.
    pub fn read(
        &self,
        partition: PartitionIndex,
        from: Offset,
        max: usize,
    ) -> TopicResult<Vec<Message>> {
        let log = self.log(partition)?.lock().expect("partition log lock poisoned");
        Ok(log.read(from, max))
    }

    /// The offset the next append to `partition` will receive.
    ///
    /// # Errors
    ///
    /// Returns `PartitionNotFound` if the partition index is out of range.
    ///
    /// # Panics
    ///
    /// Panics if the partition log mutex is poisoned.
    pub fn end_offset(&self, partition: PartitionIndex) -> TopicResult<Offset> {
        let log = self.log(partition)?.lock().expect("partition log lock poisoned");
        Ok(log.end_offset())
    }
}

/// Metadata snapshot of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    /// Topic name.
    pub name: String,
    /// Number of partitions.
    pub partitions: u32,
    /// Identity that created the topic.
    pub creator: UserId,
    /// End offset of each partition (the offset its next append gets),
    /// indexed by partition number.
    pub end_offsets: Vec<Offset>,
}

// -----------------------------------------------------------------------------
// Topic Store
// -----------------------------------------------------------------------------

/// Registry of all topics in the broker.
#[derive(Debug)]
pub struct TopicStore {
    /// Topics by name.
    topics: RwLock<HashMap<String, Arc<Topic>>>,
    /// Resource limits applied at create and publish time.
    limits: Limits,
}

impl TopicStore {
    /// Creates an empty store enforcing the given limits.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            limits,
        }
    }

    /// Creates a topic with `partitions` partitions.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the name is empty or `partitions` is zero.
    /// - `TopicExists` if a topic with this name already exists.
    /// - `LimitExceeded` if the topic or partition limits would be exceeded.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[allow(clippy::cast_possible_truncation)] // Sizes bounded by limits.
    pub fn create(
        &self,
        name: &str,
        partitions: u32,
        creator: UserId,
    ) -> TopicResult<TopicSummary> {
        if name.is_empty() {
            return Err(TopicError::InvalidArgument {
                name: "name",
                reason: "topic name must not be empty",
            });
        }
        if partitions == 0 {
            return Err(TopicError::InvalidArgument {
                name: "partitions",
                reason: "topic must have at least one partition",
            });
        }
        if partitions > self.limits.max_partitions_per_topic {
            return Err(TopicError::LimitExceeded {
                limit: "max_partitions_per_topic",
                max: u64::from(self.limits.max_partitions_per_topic),
                actual: u64::from(partitions),
            });
        }

        let mut topics = self.topics.write().expect("topics lock poisoned");
        if topics.contains_key(name) {
            return Err(TopicError::TopicExists {
                topic: name.to_string(),
            });
        }
        if topics.len() as u64 >= u64::from(self.limits.max_topics) {
            return Err(TopicError::LimitExceeded {
                limit: "max_topics",
                max: u64::from(self.limits.max_topics),
                actual: topics.len() as u64 + 1,
            });
        }

        let topic = Arc::new(Topic::new(name.to_string(), partitions, creator));
        let summary = topic.summary();
        topics.insert(name.to_string(), topic);

        info!(topic = %name, partitions, "Created topic");
        Ok(summary)
    }

    /// Deletes a topic. Only the creator may delete it.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if no topic with this name exists.
    /// - `NotCreator` if `requester` did not create the topic.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn delete(&self, name: &str, requester: &UserId) -> TopicResult<()> {
        let mut topics = self.topics.write().expect("topics lock poisoned");
        let topic = topics.get(name).ok_or_else(|| TopicError::TopicNotFound {
            topic: name.to_string(),
        })?;
        if topic.creator() != requester {
            return Err(TopicError::NotCreator {
                topic: name.to_string(),
            });
        }
        topics.remove(name);

        info!(topic = %name, "Deleted topic");
        Ok(())
    }

    /// Lists all topics, sorted by name.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[must_use]
    pub fn list(&self) -> Vec<TopicSummary> {
        let topics = self.topics.read().expect("topics lock poisoned");
        let mut summaries: Vec<TopicSummary> = topics.values().map(|t| t.summary()).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Publishes a message, routing it to a partition.
    ///
    /// Routing precedence: an explicit `partition` wins; otherwise a
    /// keyed message is hashed to a partition; unkeyed messages go to
    /// partition 0. Returns the chosen partition and assigned offset.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if the topic does not exist.
    /// - `PartitionNotFound` if an explicit partition is out of range.
    /// - `LimitExceeded` if the message exceeds size limits.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn publish(
        &self,
        topic: &str,
        partition: Option<PartitionIndex>,
        message: Message,
        now_us: u64,
    ) -> TopicResult<(PartitionIndex, Offset)> {
        message.validate(&self.limits)?;

        let topic_ref = self.get(topic)?;
        let target = match partition {
            Some(explicit) => explicit,
            None => match message.key.as_deref() {
                Some(key) if !key.is_empty() => {
                    partition_for_key(key, topic_ref.partition_count())
                }
                _ => PartitionIndex::new(0),
            },
        };
        let offset = topic_ref.append(target, message, now_us)?;

        debug!(topic = %topic, partition = %target, offset = %offset, "Published message");
        Ok((target, offset))
    }

    /// Reads up to `max` messages from a partition starting at `from`.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if the topic does not exist.
    /// - `PartitionNotFound` if the partition index is out of range.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn read(
        &self,
        topic: &str,
        partition: PartitionIndex,
        from: Offset,
        max: usize,
    ) -> TopicResult<Vec<Message>> {
        self.get(topic)?.read(partition, from, max)
    }

    /// Number of partitions in a topic.
    ///
    /// # Errors
    ///
    /// Returns `TopicNotFound` if the topic does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn partition_count(&self, topic: &str) -> TopicResult<u32> {
        Ok(self.get(topic)?.partition_count())
    }

    /// The offset the next append to `partition` will receive.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if the topic does not exist.
    /// - `PartitionNotFound` if the partition index is out of range.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn end_offset(&self, topic: &str, partition: PartitionIndex) -> TopicResult<Offset> {
        self.get(topic)?.end_offset(partition)
    }

    /// Verifies that a topic and partition exist.
    ///
    /// # Errors
    ///
    /// - `TopicNotFound` if the topic does not exist.
    /// - `PartitionNotFound` if the partition index is out of range.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn ensure_partition(&self, topic: &str, partition: PartitionIndex) -> TopicResult<()> {
        let topic_ref = self.get(topic)?;
        if partition.get() >= u64::from(topic_ref.partition_count()) {
            return Err(TopicError::PartitionNotFound {
                topic: topic.to_string(),
                partition,
            });
        }
        Ok(())
    }

    /// Number of topics in the store.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics.read().expect("topics lock poisoned").len()
    }

    fn get(&self, name: &str) -> TopicResult<Arc<Topic>> {
        let topics = self.topics.read().expect("topics lock poisoned");
        topics.get(name).cloned().ok_or_else(|| TopicError::TopicNotFound {
            topic: name.to_string(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TopicStore {
        TopicStore::new(Limits::new())
    }

    fn message(payload: &str) -> Message {
        Message::new(payload.as_bytes().to_vec(), UserId::new("alice"))
    }

    #[test]
    fn test_create_and_list() {
        let store = store();
        store.create("orders", 3, UserId::new("alice")).unwrap();
        store.create("alerts", 1, UserId::new("bob")).unwrap();

        let topics = store.list();
        assert_eq!(topics.len(), 2);
        // Sorted by name.
        assert_eq!(topics[0].name, "alerts");
        assert_eq!(topics[1].name, "orders");
        assert_eq!(topics[1].partitions, 3);
        assert_eq!(topics[1].creator, UserId::new("alice"));
        assert_eq!(topics[1].end_offsets, vec![Offset::earliest(); 3]);
    }

    #[test]
    fn test_list_reports_end_offsets() {
        let store = store();
        store.create("orders", 2, UserId::new("alice")).unwrap();
        store
            .publish("orders", Some(PartitionIndex::new(1)), message("a"), 0)
            .unwrap();
        store
            .publish("orders", Some(PartitionIndex::new(1)), message("b"), 0)
            .unwrap();

        let topics = store.list();
        assert_eq!(topics[0].end_offsets, vec![Offset::new(0), Offset::new(2)]);
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let store = store();
        store.create("orders", 1, UserId::new("alice")).unwrap();

        let err = store.create("orders", 2, UserId::new("bob")).unwrap_err();
        assert!(matches!(err, TopicError::TopicExists { .. }));
        assert_eq!(store.topic_count(), 1);
    }

    #[test]
    fn test_create_rejects_zero_partitions() {
        let err = store().create("orders", 0, UserId::new("alice")).unwrap_err();
        assert!(matches!(err, TopicError::InvalidArgument { name: "partitions", .. }));
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let err = store().create("", 1, UserId::new("alice")).unwrap_err();
        assert!(matches!(err, TopicError::InvalidArgument { name: "name", .. }));
    }

    #[test]
    fn test_create_enforces_partition_limit() {
        let limits = Limits {
            max_partitions_per_topic: 4,
            ..Limits::new()
        };
        let store = TopicStore::new(limits);

        let err = store.create("orders", 5, UserId::new("alice")).unwrap_err();
        assert!(matches!(
            err,
            TopicError::LimitExceeded { limit: "max_partitions_per_topic", max: 4, actual: 5 }
        ));
    }

    #[test]
    fn test_create_enforces_topic_limit() {
        let limits = Limits {
            max_topics: 2,
            ..Limits::new()
        };
        let store = TopicStore::new(limits);
        store.create("a", 1, UserId::new("alice")).unwrap();
        store.create("b", 1, UserId::new("alice")).unwrap();

        let err = store.create("c", 1, UserId::new("alice")).unwrap_err();
        assert!(matches!(err, TopicError::LimitExceeded { limit: "max_topics", .. }));
    }

    #[test]
    fn test_delete_requires_creator() {
        let store = store();
        store.create("orders", 1, UserId::new("alice")).unwrap();

        let err = store.delete("orders", &UserId::new("bob")).unwrap_err();
        assert!(matches!(err, TopicError::NotCreator { .. }));
        assert_eq!(store.topic_count(), 1);

        store.delete("orders", &UserId::new("alice")).unwrap();
        assert_eq!(store.topic_count(), 0);
    }

    #[test]
    fn test_delete_missing_topic() {
        let err = store().delete("ghost", &UserId::new("alice")).unwrap_err();
        assert!(matches!(err, TopicError::TopicNotFound { .. }));
    }

    #[test]
    fn test_publish_assigns_sequential_offsets() {
        let store = store();
        store.create("orders", 1, UserId::new("alice")).unwrap();

        let (_, first) = store.publish("orders", None, message("a"), 0).unwrap();
        let (_, second) = store.publish("orders", None, message("b"), 0).unwrap();

        assert_eq!(first, Offset::new(0));
        assert_eq!(second, Offset::new(1));
    }

    #[test]
    fn test_publish_explicit_partition_wins_over_key() {
        let store = store();
        store.create("orders", 4, UserId::new("alice")).unwrap();

        let msg = message("a").with_key("customer-9");
        let (partition, _) = store
            .publish("orders", Some(PartitionIndex::new(2)), msg, 0)
            .unwrap();

        assert_eq!(partition, PartitionIndex::new(2));
    }

    #[test]
    fn test_publish_routes_same_key_to_same_partition() {
        let store = store();
        store.create("orders", 8, UserId::new("alice")).unwrap();

        let (first, _) = store
            .publish("orders", None, message("a").with_key("customer-9"), 0)
            .unwrap();
        let (second, _) = store
            .publish("orders", None, message("b").with_key("customer-9"), 0)
            .unwrap();

        assert_eq!(first, second);
        let end = store.end_offset("orders", first).unwrap();
        assert_eq!(end, Offset::new(2));
    }

    #[test]
    fn test_publish_unkeyed_goes_to_partition_zero() {
        let store = store();
        store.create("orders", 4, UserId::new("alice")).unwrap();

        let (partition, _) = store.publish("orders", None, message("a"), 0).unwrap();
        assert_eq!(partition, PartitionIndex::new(0));
    }

    #[test]
    fn test_publish_empty_key_goes_to_partition_zero() {
        let store = store();
        store.create("orders", 4, UserId::new("alice")).unwrap();

        let (partition, _) = store
            .publish("orders", None, message("a").with_key(""), 0)
            .unwrap();
        assert_eq!(partition, PartitionIndex::new(0));
    }

    #[test]
    fn test_publish_rejects_out_of_range_partition() {
        let store = store();
        store.create("orders", 2, UserId::new("alice")).unwrap();

        let err = store
            .publish("orders", Some(PartitionIndex::new(2)), message("a"), 0)
            .unwrap_err();
        assert!(matches!(err, TopicError::PartitionNotFound { .. }));
    }

    #[test]
    fn test_publish_rejects_oversized_message() {
        let limits = Limits {
            max_message_bytes: 4,
            ..Limits::new()
        };
        let store = TopicStore::new(limits);
        store.create("orders", 1, UserId::new("alice")).unwrap();

        let err = store.publish("orders", None, message("too big"), 0).unwrap_err();
        assert!(matches!(err, TopicError::LimitExceeded { limit: "max_message_bytes", .. }));
    }

    #[test]
    fn test_publish_to_missing_topic() {
        let err = store().publish("ghost", None, message("a"), 0).unwrap_err();
        assert!(matches!(err, TopicError::TopicNotFound { .. }));
    }

    #[test]
    fn test_read_returns_window() {
        let store = store();
        store.create("orders", 1, UserId::new("alice")).unwrap();
        for i in 0..5 {
            store.publish("orders", None, message(&format!("m{i}")), 0).unwrap();
        }

        let window = store
            .read("orders", PartitionIndex::new(0), Offset::new(2), 2)
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].offset, Offset::new(2));
        assert_eq!(window[1].offset, Offset::new(3));
    }

    #[test]
    fn test_read_preserves_publish_order() {
        let store = store();
        store.create("orders", 1, UserId::new("alice")).unwrap();
        for i in 0..10 {
            store.publish("orders", None, message(&format!("m{i}")), 0).unwrap();
        }

        let all = store
            .read("orders", PartitionIndex::new(0), Offset::earliest(), 100)
            .unwrap();
        assert_eq!(all.len(), 10);
        for (i, msg) in all.iter().enumerate() {
            assert_eq!(msg.payload.as_ref(), format!("m{i}").as_bytes());
        }
    }

    #[test]
    fn test_ensure_partition() {
        let store = store();
        store.create("orders", 2, UserId::new("alice")).unwrap();

        assert!(store.ensure_partition("orders", PartitionIndex::new(1)).is_ok());
        assert!(matches!(
            store.ensure_partition("orders", PartitionIndex::new(2)).unwrap_err(),
            TopicError::PartitionNotFound { .. }
        ));
        assert!(matches!(
            store.ensure_partition("ghost", PartitionIndex::new(0)).unwrap_err(),
            TopicError::TopicNotFound { .. }
        ));
    }

    #[test]
    fn test_recreate_after_delete_starts_fresh() {
        let store = store();
        let alice = UserId::new("alice");
        store.create("orders", 1, alice.clone()).unwrap();
        store.publish("orders", None, message("old"), 0).unwrap();
        store.delete("orders", &alice).unwrap();

        store.create("orders", 1, alice).unwrap();
        let end = store.end_offset("orders", PartitionIndex::new(0)).unwrap();
        assert_eq!(end, Offset::earliest());
    }
}
