//! Consumer-group offset tracking.
//!
//! Each consumer group records, per topic partition, the next offset it
//! intends to read. Groups are implicit: there is no registration, and
//! a group that has never committed reads from offset 0. Commits are
//! last-write-wins; the tracker does not police direction, so a group
//! can rewind itself by committing a lower offset.

use std::collections::HashMap;
use std::sync::Mutex;

use courier_core::{Offset, PartitionIndex};
use tracing::debug;

// -----------------------------------------------------------------------------
// Group Key
// -----------------------------------------------------------------------------

/// Identifies one consumer group's position on one partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// Topic name.
    pub topic: String,
    /// Consumer group name.
    pub group: String,
    /// Partition within the topic.
    pub partition: PartitionIndex,
}

impl GroupKey {
    /// Creates a key for `(topic, group, partition)`.
    pub fn new(
        topic: impl Into<String>,
        group: impl Into<String>,
        partition: PartitionIndex,
    ) -> Self {
        Self {
            topic: topic.into(),
            group: group.into(),
            partition,
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.topic, self.group, self.partition)
    }
}

// -----------------------------------------------------------------------------
// Offset Tracker
// -----------------------------------------------------------------------------

/// Tracks committed read positions for all consumer groups.
///
/// Entries are independent, so a single mutex over the map suffices:
/// it is held for one insert or lookup at a time. Existence of the
/// underlying topic and partition is the caller's concern; the tracker
/// stores positions for whatever keys it is given.
#[derive(Debug, Default)]
pub struct OffsetTracker {
    /// Committed next-offset-to-read per (topic, group, partition).
    offsets: Mutex<HashMap<GroupKey, Offset>>,
}

impl OffsetTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offsets: Mutex::new(HashMap::new()),
        }
    }

    /// Commits `offset` as the next offset the group will read.
    ///
    /// Last-write-wins: a later commit overwrites an earlier one, even
    /// if it moves backward.
    ///
    /// # Panics
    ///
    /// Panics if the offsets lock is poisoned.
    pub fn commit(&self, key: GroupKey, offset: Offset) {
        let mut offsets = self.offsets.lock().expect("offsets lock poisoned");
        debug!(key = %key, offset = %offset, "Committed offset");
        offsets.insert(key, offset);
    }

    /// The committed position for a key, or offset 0 if the group has
    /// never committed on this partition.
    ///
    /// # Panics
    ///
    /// Panics if the offsets lock is poisoned.
    #[must_use]
    pub fn committed(&self, key: &GroupKey) -> Offset {
        let offsets = self.offsets.lock().expect("offsets lock poisoned");
        offsets.get(key).copied().unwrap_or_else(Offset::earliest)
    }

    /// Removes every entry referencing `topic`.
    ///
    /// Called when a topic is deleted so stale positions do not leak
    /// into a topic later recreated under the same name.
    ///
    /// # Panics
    ///
    /// Panics if the offsets lock is poisoned.
    pub fn drop_topic(&self, topic: &str) {
        let mut offsets = self.offsets.lock().expect("offsets lock poisoned");
        let before = offsets.len();
        offsets.retain(|key, _| key.topic != topic);
        let removed = before - offsets.len();
        if removed > 0 {
            debug!(topic = %topic, removed, "Dropped topic offsets");
        }
    }

    /// Number of tracked (topic, group, partition) entries.
    ///
    /// # Panics
    ///
    /// Panics if the offsets lock is poisoned.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.offsets.lock().expect("offsets lock poisoned").len()
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
