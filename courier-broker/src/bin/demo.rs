//! End-to-end broker lifecycle demo.
//!
//! Walks the whole facade surface in-process: sessions, topic
//! publish/pull/commit with independent consumer groups, creator-only
//! deletion, and a queue delivered with lease-based acks.
//!
//! ```bash
//! cargo run --bin courier-demo
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use clap::Parser;
use courier_broker::{Broker, BrokerConfig};
use courier_core::{Offset, PartitionIndex};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// End-to-end broker lifecycle demo.
#[derive(Parser, Debug)]
#[command(name = "courier-demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let broker = Broker::new(BrokerConfig::new())?;
    let sweeper = broker.spawn_sweeper();

    // Sessions: three users, none of them special.
    let alice = broker.login("alice", "wonderland");
    let bob = broker.login("bob", "builder");
    let carol = broker.login("carol", "daemon");
    info!("Logged in alice, bob, and carol");

    // -------------------------------------------------------------------------
    // Topics
    // -------------------------------------------------------------------------

    broker.create_topic(&alice, "orders", 3)?;
    let err = broker
        .create_topic(&bob, "orders", 1)
        .expect_err("duplicate topic name must be rejected");
    info!(kind = %err.kind(), "Duplicate create rejected: {err}");

    for payload in ["2 espressos", "1 flat white", "cancel the espressos"] {
        let (partition, offset) = broker.publish(
            &alice,
            "orders",
            Some(PartitionIndex::new(0)),
            None,
            payload.as_bytes().to_vec(),
        )?;
        info!(partition = %partition, offset = %offset, "Published {payload:?}");
    }

    // Keyed publishes route by hash: the same key lands on the same
    // partition without the publisher picking one.
    let (p1, _) = broker.publish(&bob, "orders", None, Some("customer-7"), b"refill".to_vec())?;
    let (p2, _) = broker.publish(&bob, "orders", None, Some("customer-7"), b"to go".to_vec())?;
    info!(first = %p1, second = %p2, "Key customer-7 routed consistently");

    // Group g1 reads, commits, and catches up; g2 is untouched.
    let batch = broker.pull(&carol, "orders", PartitionIndex::new(0), "g1", 100)?;
    info!(messages = batch.len(), "g1 pulled partition 0");
    broker.commit_offset(
        &carol,
        "orders",
        "g1",
        PartitionIndex::new(0),
        Offset::new(batch.len() as u64),
    )?;
    let caught_up = broker.pull(&carol, "orders", PartitionIndex::new(0), "g1", 100)?;
    info!(messages = caught_up.len(), "g1 after commit (expected 0)");
    let fresh = broker.pull(&bob, "orders", PartitionIndex::new(0), "g2", 100)?;
    info!(messages = fresh.len(), "g2 still sees everything");

    for topic in broker.list_topics(&carol)? {
        info!(
            topic = %topic.name,
            partitions = topic.partitions,
            creator = %topic.creator,
            end_offsets = ?topic.end_offsets,
            "Topic"
        );
    }

    // Deletion is creator-only.
    let err = broker
        .delete_topic(&carol, "orders")
        .expect_err("only the creator may delete a topic");
    info!(kind = %err.kind(), "carol's delete rejected: {err}");
    broker.delete_topic(&alice, "orders")?;
    info!("alice deleted her topic");

    // -------------------------------------------------------------------------
    // Queues
    // -------------------------------------------------------------------------

    broker.create_queue(&bob, "print-jobs")?;
    broker.enqueue(&alice, "print-jobs", b"print: menu.pdf".to_vec())?;
    broker.enqueue(&carol, "print-jobs", b"print: rota.pdf".to_vec())?;

    let job = broker
        .dequeue(&bob, "print-jobs")?
        .expect("a job is visible");
    info!(id = %job.id, payload = ?job.payload, "bob leased the oldest job");
    broker.ack(&bob, "print-jobs", job.id)?;
    info!(id = %job.id, "bob acked it");

    for queue in broker.list_queues(&alice)? {
        info!(
            queue = %queue.name,
            visible = queue.visible,
            leased = queue.leased,
            "Queue"
        );
    }

    let err = broker
        .delete_queue(&alice, "print-jobs")
        .expect_err("only the creator may delete a queue");
    info!(kind = %err.kind(), "alice's delete rejected: {err}");
    broker.delete_queue(&bob, "print-jobs")?;
    info!("bob deleted his queue");

    sweeper.shutdown().await;
    info!("Demo complete");
    Ok(())
}
