//! Queue registry with lease-based delivery.
//!
//! Queues hold messages in a `BTreeMap` keyed by their store-wide
//! monotonic id, so iteration order is enqueue order and a message
//! whose lease expires reappears in its original FIFO position rather
//! than at the tail.

#![allow(clippy::significant_drop_tightening)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use bytes::Bytes;
use courier_core::{Limits, MessageId, Timestamp, UserId};
use tracing::{debug, info};

use crate::error::{QueueError, QueueResult};
use crate::types::{LeaseState, QueueMessage, QueueSummary};

// -----------------------------------------------------------------------------
// Queue
// -----------------------------------------------------------------------------

/// A single FIFO queue. Callers hold the queue's mutex.
#[derive(Debug)]
struct Queue {
    /// Queue name, unique within the store.
    name: String,
    /// Identity that created the queue. Only the creator may delete it.
    creator: UserId,
    /// Messages by id; id order is enqueue order.
    messages: BTreeMap<MessageId, QueueMessage>,
}

impl Queue {
    fn new(name: String, creator: UserId) -> Self {
        Self {
            name,
            creator,
            messages: BTreeMap::new(),
        }
    }

    /// Reverts every expired lease to `Visible`. Returns how many
    /// messages were reclaimed.
    fn reclaim_expired(&mut self, now_us: u64) -> usize {
        let mut reclaimed = 0;
        for message in self.messages.values_mut() {
            if message.state.is_expired(now_us) {
                message.state = LeaseState::Visible;
                reclaimed += 1;
                debug!(
                    queue = %self.name,
                    id = %message.id,
                    delivery_count = message.delivery_count,
                    "Lease expired, message visible again"
                );
            }
        }
        reclaimed
    }

    /// Leases the head-of-line visible message until `now_us + ttl_us`.
    fn dequeue(&mut self, now_us: u64, ttl_us: u64) -> Option<QueueMessage> {
        self.reclaim_expired(now_us);
        let message = self
            .messages
            .values_mut()
            .find(|m| m.state == LeaseState::Visible)?;
        message.delivery_count += 1;
        message.state = LeaseState::Leased {
            expires_at_us: now_us.saturating_add(ttl_us),
        };
        Some(message.clone())
    }

    fn summary(&self) -> QueueSummary {
        let leased = self
            .messages
            .values()
            .filter(|m| matches!(m.state, LeaseState::Leased { .. }))
            .count();
        QueueSummary {
            name: self.name.clone(),
            creator: self.creator.clone(),
            visible: self.messages.len() - leased,
            leased,
        }
    }
}

// -----------------------------------------------------------------------------
// Queue Store
// -----------------------------------------------------------------------------

/// Registry of all queues in the broker.
///
/// Message ids are allocated from a store-wide counter while the
/// target queue's mutex is held, so within one queue id order and
/// delivery order agree.
#[derive(Debug)]
pub struct QueueStore {
    /// Queues by name.
    queues: RwLock<HashMap<String, Arc<Mutex<Queue>>>>,
    /// Next message id. Starts at 1; id 0 is never issued.
    next_id: AtomicU64,
    /// Resource limits applied at create and enqueue time.
    limits: Limits,
}

impl QueueStore {
    /// Creates an empty store enforcing the given limits.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            limits,
        }
    }

    /// Creates a queue.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the name is empty.
    /// - `QueueExists` if a queue with this name already exists.
    /// - `LimitExceeded` if the queue limit would be exceeded.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[allow(clippy::cast_possible_truncation)] // Sizes bounded by limits.
    pub fn create(&self, name: &str, creator: UserId) -> QueueResult<QueueSummary> {
        if name.is_empty() {
            return Err(QueueError::InvalidArgument {
                name: "name",
                reason: "queue name must not be empty",
            });
        }

        let mut queues = self.queues.write().expect("queues lock poisoned");
        if queues.contains_key(name) {
            return Err(QueueError::QueueExists {
                queue: name.to_string(),
            });
        }
        if queues.len() as u64 >= u64::from(self.limits.max_queues) {
            return Err(QueueError::LimitExceeded {
                limit: "max_queues",
                max: u64::from(self.limits.max_queues),
                actual: queues.len() as u64 + 1,
            });
        }

        let queue = Queue::new(name.to_string(), creator);
        let summary = queue.summary();
        queues.insert(name.to_string(), Arc::new(Mutex::new(queue)));

        info!(queue = %name, "Created queue");
        Ok(summary)
    }

    /// Deletes a queue and drops all of its messages, leased or not.
    /// Only the creator may delete it.
    ///
    /// # Errors
    ///
    /// - `QueueNotFound` if no queue with this name exists.
    /// - `NotCreator` if `requester` did not create the queue.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn delete(&self, name: &str, requester: &UserId) -> QueueResult<()> {
        let mut queues = self.queues.write().expect("queues lock poisoned");
        let queue = queues.get(name).ok_or_else(|| QueueError::QueueNotFound {
            queue: name.to_string(),
        })?;
        {
            let queue = queue.lock().expect("queue lock poisoned");
            if queue.creator != *requester {
                return Err(QueueError::NotCreator {
                    queue: name.to_string(),
                });
            }
        }
        queues.remove(name);

        info!(queue = %name, "Deleted queue");
        Ok(())
    }

    /// Lists all queues, sorted by name. Expired leases are reclaimed
    /// first so the reported counts reflect `now_us`.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    #[must_use]
    pub fn list(&self, now_us: u64) -> Vec<QueueSummary> {
        let queues = self.queues.read().expect("queues lock poisoned");
        let mut summaries: Vec<QueueSummary> = queues
            .values()
            .map(|q| {
                let mut queue = q.lock().expect("queue lock poisoned");
                queue.reclaim_expired(now_us);
                queue.summary()
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Appends a message at the tail of the queue, returning its id.
    ///
    /// # Errors
    ///
    /// - `QueueNotFound` if the queue does not exist.
    /// - `LimitExceeded` if the payload or queue depth exceeds limits.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    #[allow(clippy::cast_possible_truncation)] // Sizes bounded by limits.
    pub fn enqueue(
        &self,
        queue: &str,
        payload: impl Into<Bytes>,
        producer: UserId,
        now_us: u64,
    ) -> QueueResult<MessageId> {
        let payload = payload.into();
        if payload.len() as u64 > u64::from(self.limits.max_message_bytes) {
            return Err(QueueError::LimitExceeded {
                limit: "max_message_bytes",
                max: u64::from(self.limits.max_message_bytes),
                actual: payload.len() as u64,
            });
        }

        let queue_ref = self.get(queue)?;
        let mut locked = queue_ref.lock().expect("queue lock poisoned");
        if locked.messages.len() as u64 >= u64::from(self.limits.max_queue_depth) {
            return Err(QueueError::LimitExceeded {
                limit: "max_queue_depth",
                max: u64::from(self.limits.max_queue_depth),
                actual: locked.messages.len() as u64 + 1,
            });
        }

        // Allocate under the queue lock so id order matches FIFO order.
        let id = MessageId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        #[allow(clippy::cast_possible_wrap)]
        let enqueued_at = Timestamp::from_micros(now_us as i64);
        locked
            .messages
            .insert(id, QueueMessage::new(id, payload, producer, enqueued_at));

        debug!(queue = %queue, id = %id, "Enqueued message");
        Ok(id)
    }

    /// Delivers the oldest visible message, leasing it for `ttl_us`.
    ///
    /// Expired leases are reclaimed first, so a message whose previous
    /// consumer missed its deadline is delivered again here with the
    /// same id, payload, and position. Returns `None` when nothing is
    /// visible; an empty queue is not an error.
    ///
    /// # Errors
    ///
    /// Returns `QueueNotFound` if the queue does not exist.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn dequeue(
        &self,
        queue: &str,
        now_us: u64,
        ttl_us: u64,
    ) -> QueueResult<Option<QueueMessage>> {
        let queue_ref = self.get(queue)?;
        let mut locked = queue_ref.lock().expect("queue lock poisoned");
        let message = locked.dequeue(now_us, ttl_us);
        if let Some(ref msg) = message {
            debug!(
                queue = %queue,
                id = %msg.id,
                delivery_count = msg.delivery_count,
                "Leased message"
            );
        }
        Ok(message)
    }

    /// Permanently removes a message.
    ///
    /// Succeeds while the id is still present, whether leased or
    /// already reclaimed to visible: a consumer that finished the work
    /// late still settles it. Acking an id that was already removed
    /// returns `MessageNotFound`.
    ///
    /// # Errors
    ///
    /// - `QueueNotFound` if the queue does not exist.
    /// - `MessageNotFound` if the id is not present in the queue.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn ack(&self, queue: &str, id: MessageId) -> QueueResult<()> {
        let queue_ref = self.get(queue)?;
        let mut locked = queue_ref.lock().expect("queue lock poisoned");
        locked
            .messages
            .remove(&id)
            .ok_or_else(|| QueueError::MessageNotFound {
                queue: queue.to_string(),
                id,
            })?;

        debug!(queue = %queue, id = %id, "Acked message");
        Ok(())
    }

    /// Reclaims expired leases across every queue. Returns how many
    /// messages became visible again.
    ///
    /// Reclamation also happens lazily on dequeue and list; this sweep
    /// exists so queue state converges even when nobody is consuming.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn reclaim_expired(&self, now_us: u64) -> usize {
        let queues: Vec<Arc<Mutex<Queue>>> = {
            let queues = self.queues.read().expect("queues lock poisoned");
            queues.values().cloned().collect()
        };
        queues
            .iter()
            .map(|q| q.lock().expect("queue lock poisoned").reclaim_expired(now_us))
            .sum()
    }

    /// Number of queues in the store.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.queues.read().expect("queues lock poisoned").len()
    }

    fn get(&self, name: &str) -> QueueResult<Arc<Mutex<Queue>>> {
        let queues = self.queues.read().expect("queues lock poisoned");
        queues.get(name).cloned().ok_or_else(|| QueueError::QueueNotFound {
            queue: name.to_string(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
