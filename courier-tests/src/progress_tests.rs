//! Consumer-group progress integration tests.
//!
//! Verifies that committed offsets are keyed by (topic, group,
//! partition) with no bleed between any of the three, and that offsets
//! die with their topic.

use courier_core::{Offset, PartitionIndex};

use crate::scenarios::{manual_broker, session};

const P0: PartitionIndex = PartitionIndex::new(0);
const P1: PartitionIndex = PartitionIndex::new(1);

#[test]
fn test_progress_groups_do_not_share_offsets() {
    let broker = manual_broker();
    let user = session(&broker, "user");
    broker.create_topic(&user, "events", 1).unwrap();
    for i in 0..6 {
        broker
            .publish(&user, "events", None, None, format!("m{i}").into_bytes())
            .unwrap();
    }

    broker
        .commit_offset(&user, "events", "fast", P0, Offset::new(6))
        .unwrap();
    broker
        .commit_offset(&user, "events", "slow", P0, Offset::new(2))
        .unwrap();

    assert!(broker
        .pull(&user, "events", P0, "fast", 10)
        .unwrap()
        .is_empty());
    assert_eq!(broker.pull(&user, "events", P0, "slow", 10).unwrap().len(), 4);
    assert_eq!(broker.pull(&user, "events", P0, "fresh", 10).unwrap().len(), 6);
}

#[test]
fn test_progress_offsets_tracked_per_partition() {
    let broker = manual_broker();
    let user = session(&broker, "user");
    broker.create_topic(&user, "events", 2).unwrap();
    for partition in [P0, P1] {
        for i in 0..4 {
            broker
                .publish(
                    &user,
                    "events",
                    Some(partition),
                    None,
                    format!("m{i}").into_bytes(),
                )
                .unwrap();
        }
    }

    broker
        .commit_offset(&user, "events", "g", P0, Offset::new(4))
        .unwrap();
    broker
        .commit_offset(&user, "events", "g", P1, Offset::new(1))
        .unwrap();

    assert!(broker.pull(&user, "events", P0, "g", 10).unwrap().is_empty());
    assert_eq!(broker.pull(&user, "events", P1, "g", 10).unwrap().len(), 3);
}

#[test]
fn test_progress_same_group_name_across_topics() {
    let broker = manual_broker();
    let user = session(&broker, "user");
    broker.create_topic(&user, "alpha", 1).unwrap();
    broker.create_topic(&user, "beta", 1).unwrap();
    for _ in 0..3 {
        broker.publish(&user, "alpha", None, None, b"a".to_vec()).unwrap();
        broker.publish(&user, "beta", None, None, b"b".to_vec()).unwrap();
    }

    // Group "g" catches up on alpha only.
    broker
        .commit_offset(&user, "alpha", "g", P0, Offset::new(3))
        .unwrap();

    assert!(broker.pull(&user, "alpha", P0, "g", 10).unwrap().is_empty());
    assert_eq!(broker.pull(&user, "beta", P0, "g", 10).unwrap().len(), 3);
}

#[test]
fn test_progress_commit_beyond_end_is_allowed() {
    let broker = manual_broker();
    let user = session(&broker, "user");
    broker.create_topic(&user, "events", 1).unwrap();
    broker.publish(&user, "events", None, None, b"m0".to_vec()).unwrap();
    broker.publish(&user, "events", None, None, b"m1".to_vec()).unwrap();

    // Committing past the end is not an error; the group just reads
    // nothing until the log grows that far.
    broker
        .commit_offset(&user, "events", "g", P0, Offset::new(10))
        .unwrap();
    assert!(broker.pull(&user, "events", P0, "g", 10).unwrap().is_empty());

    broker
        .commit_offset(&user, "events", "g", P0, Offset::earliest())
        .unwrap();
    assert_eq!(broker.pull(&user, "events", P0, "g", 10).unwrap().len(), 2);
}

#[test]
fn test_progress_dropped_only_with_its_topic() {
    let broker = manual_broker();
    let user = session(&broker, "user");
    broker.create_topic(&user, "doomed", 1).unwrap();
    broker.create_topic(&user, "stable", 1).unwrap();
    for _ in 0..2 {
        broker.publish(&user, "doomed", None, None, b"d".to_vec()).unwrap();
        broker.publish(&user, "stable", None, None, b"s".to_vec()).unwrap();
    }
    broker
        .commit_offset(&user, "doomed", "g", P0, Offset::new(2))
        .unwrap();
    broker
        .commit_offset(&user, "stable", "g", P0, Offset::new(1))
        .unwrap();

    broker.delete_topic(&user, "doomed").unwrap();

    // The surviving topic's progress is untouched.
    assert_eq!(broker.pull(&user, "stable", P0, "g", 10).unwrap().len(), 1);

    // A recreated topic starts with no progress for any group.
    broker.create_topic(&user, "doomed", 1).unwrap();
    broker.publish(&user, "doomed", None, None, b"d2".to_vec()).unwrap();
    let batch = broker.pull(&user, "doomed", P0, "g", 10).unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].payload.as_ref(), b"d2");
}
