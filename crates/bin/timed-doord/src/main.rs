//! # timed-doord — timed door daemon
//!
//! Composition root that wires a door to a scheduler and a reporting channel.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Construct the failure bus and the tokio scheduler that reports to it
//! - Construct the door, injecting the scheduler via the port trait
//! - Open the door, optionally lock it again, and log any violation
//! - Stop early on SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on every other crate.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::time::Duration;

use timed_door_app::failure_bus::InProcessFailureBus;
use timed_door_app::scheduler::TokioScheduler;
use timed_door_app::timed_door::TimedDoor;
use timed_door_domain::error::DoorLeftOpen;
use timed_door_domain::timeout::Timeout;
use tokio::time::Instant;
use tokio_stream::{Stream, StreamExt};
use tracing_subscriber::EnvFilter;

use config::Config;

/// Extra wait past the timeout before concluding no violation is coming.
const GRACE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Reporting channel
    let bus = InProcessFailureBus::new(config.door.bus_capacity);
    let mut violations = Box::pin(bus.violations());

    // Scheduler & door
    let scheduler = TokioScheduler::try_current(bus)?;
    let door = TimedDoor::with_timeout(config.timeout()?, scheduler);
    tracing::info!(door_id = %door.id(), timeout = %door.timeout(), "door ready");

    door.unlock();
    let deadline = violation_deadline(Instant::now(), door.timeout());
    tracing::info!("door unlocked");

    if let Some(hold) = config.hold_open() {
        tokio::time::sleep(hold).await;
        door.lock();
        tracing::info!(held_ms = hold.as_millis(), "door locked");
    }

    tokio::select! {
        outcome = next_violation(&mut violations, deadline) => match outcome {
            Some(violation) => {
                let payload = serde_json::to_string(&violation)?;
                tracing::warn!(door_id = %violation.door_id, %payload, "door left open");
            }
            None => tracing::info!("door closed in time"),
        },
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }

    Ok(())
}

/// When to stop waiting for a violation. `None` when the timeout is too large
/// to land on the clock; then the wait has no deadline.
fn violation_deadline(unlocked_at: Instant, timeout: Timeout) -> Option<Instant> {
    unlocked_at
        .checked_add(timeout.as_duration())?
        .checked_add(GRACE)
}

async fn next_violation<S>(violations: &mut S, deadline: Option<Instant>) -> Option<DoorLeftOpen>
where
    S: Stream<Item = DoorLeftOpen> + Unpin,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, violations.next())
            .await
            .ok()
            .flatten(),
        None => violations.next().await,
    }
}
