//! Match-day ticketing scenario.
//!
//! A small newsroom-and-box-office simulation on one broker: match
//! events are published per match (key-routed, so each match stays on
//! one partition), two fan clubs follow them as independent consumer
//! groups, and ticket requests flow through a queue where a crashed
//! agent's lease visibly expires and the request is redelivered.
//!
//! ```bash
//! cargo run --bin courier-scenario -- --lease-secs 2
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use clap::Parser;
use courier_broker::{Broker, BrokerConfig};
use courier_core::{Offset, PartitionIndex};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Match-day ticketing scenario.
#[derive(Parser, Debug)]
#[command(name = "courier-scenario")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Queue lease TTL in seconds. Short by default so the redelivery
    /// wait is visible but brief.
    #[arg(long, default_value = "2")]
    lease_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = BrokerConfig::new()
        .with_lease_ttl_us(args.lease_secs * 1_000_000)
        .with_sweep_interval_us(500_000);
    let broker = Broker::new(config)?;
    let sweeper = broker.spawn_sweeper();

    // Six participants.
    let matchdesk = broker.login("matchdesk", "kickoff");
    let gate_ops = broker.login("gate-ops", "turnstile");
    let press = broker.login("press", "deadline");
    let fans_north = broker.login("fans-north", "scarves");
    let fans_south = broker.login("fans-south", "drums");
    let agent = broker.login("agent", "headset");

    broker.create_topic(&matchdesk, "match-events", 4)?;
    broker.create_topic(&matchdesk, "news-flash", 1)?;
    broker.create_queue(&gate_ops, "ticket-requests")?;
    broker.create_queue(&gate_ops, "vip-support")?;

    // -------------------------------------------------------------------------
    // Key-routed match events
    // -------------------------------------------------------------------------

    let events = [
        ("ARG-FRA", "kickoff"),
        ("BRA-GER", "kickoff"),
        ("ARG-FRA", "goal: 1-0"),
        ("BRA-GER", "yellow card"),
        ("ARG-FRA", "goal: 2-0"),
    ];
    let mut arg_fra_partition = None;
    for (matchup, event) in events {
        let (partition, offset) = broker.publish(
            &matchdesk,
            "match-events",
            None,
            Some(matchup),
            format!("{matchup}: {event}").into_bytes(),
        )?;
        if matchup == "ARG-FRA" {
            arg_fra_partition = Some(partition);
        }
        info!(matchup, partition = %partition, offset = %offset, "Event published");
    }
    let arg_fra_partition = arg_fra_partition.expect("ARG-FRA events were published");

    broker.publish(
        &matchdesk,
        "news-flash",
        None,
        None,
        b"gates open at noon".to_vec(),
    )?;

    // Two fan clubs follow the same match at their own pace.
    let north = broker.pull(&fans_north, "match-events", arg_fra_partition, "fans-north", 100)?;
    info!(events = north.len(), "fans-north caught up on ARG-FRA");
    broker.commit_offset(
        &fans_north,
        "match-events",
        "fans-north",
        arg_fra_partition,
        Offset::new(north.len() as u64),
    )?;

    let south = broker.pull(&fans_south, "match-events", arg_fra_partition, "fans-south", 100)?;
    info!(
        events = south.len(),
        "fans-south reads independently of fans-north's commit"
    );

    let flash = broker.pull(&press, "news-flash", PartitionIndex::new(0), "press", 10)?;
    info!(items = flash.len(), "press pulled the news flash");

    // -------------------------------------------------------------------------
    // Ticket queue with a crashed agent
    // -------------------------------------------------------------------------

    for fan in ["fans-north", "fans-south"] {
        let token = if fan == "fans-north" {
            &fans_north
        } else {
            &fans_south
        };
        let id =
            broker.enqueue(token, "ticket-requests", format!("2 seats for {fan}").into_bytes())?;
        info!(id = %id, fan, "Ticket request enqueued");
    }

    let dropped = broker
        .dequeue(&agent, "ticket-requests")?
        .expect("a request is visible");
    info!(
        id = %dropped.id,
        payload = ?dropped.payload,
        "Agent leased a request... and crashed without acking"
    );

    info!(secs = args.lease_secs, "Waiting for the lease to expire");
    let wait = tokio::time::Duration::from_secs(args.lease_secs)
        + tokio::time::Duration::from_millis(200);
    tokio::time::sleep(wait).await;

    let redelivered = broker
        .dequeue(&agent, "ticket-requests")?
        .expect("the expired request is visible again");
    info!(
        id = %redelivered.id,
        delivery_count = redelivered.delivery_count,
        "Same request redelivered after the missed deadline"
    );
    broker.ack(&agent, "ticket-requests", redelivered.id)?;

    // Drain the rest properly.
    while let Some(request) = broker.dequeue(&agent, "ticket-requests")? {
        broker.ack(&agent, "ticket-requests", request.id)?;
        info!(id = %request.id, "Request handled");
    }

    // VIP support is quiet today.
    let vip = broker.enqueue(&press, "vip-support", b"lost press badge".to_vec())?;
    let handled = broker
        .dequeue(&agent, "vip-support")?
        .expect("the vip request is visible");
    broker.ack(&agent, "vip-support", handled.id)?;
    info!(id = %vip, "VIP request handled immediately");

    // -------------------------------------------------------------------------
    // Closing summary
    // -------------------------------------------------------------------------

    for topic in broker.list_topics(&matchdesk)? {
        info!(
            topic = %topic.name,
            partitions = topic.partitions,
            end_offsets = ?topic.end_offsets,
            "Topic summary"
        );
    }
    for queue in broker.list_queues(&gate_ops)? {
        info!(
            queue = %queue.name,
            visible = queue.visible,
            leased = queue.leased,
            "Queue summary"
        );
    }

    sweeper.shutdown().await;
    info!("Match day over");
    Ok(())
}
