//! In-process failure bus backed by a tokio broadcast channel.
//!
//! This is the reporting channel for callbacks that fail on a scheduler's
//! own task: subscribers see every [`TimerFailure`], or just the door
//! violations through [`InProcessFailureBus::violations`].

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use timed_door_domain::error::DoorLeftOpen;

use crate::ports::{FailureReporter, TimerFailure};

/// In-process failure bus using a tokio [`broadcast`] channel.
///
/// Reporting succeeds even when there are no active subscribers
/// (the failure is simply dropped).
#[derive(Clone)]
pub struct InProcessFailureBus {
    sender: broadcast::Sender<TimerFailure>,
}

impl InProcessFailureBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to failures on this bus.
    ///
    /// Returns a receiver that will get all failures reported *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TimerFailure> {
        self.sender.subscribe()
    }

    /// Stream of door violations reported after this call.
    ///
    /// Other failure kinds are skipped. A subscriber that falls more than the
    /// bus capacity behind loses the oldest entries; that is logged.
    pub fn violations(&self) -> impl Stream<Item = DoorLeftOpen> + Send + 'static {
        BroadcastStream::new(self.sender.subscribe()).filter_map(|received| match received {
            Ok(failure) => failure.as_door_left_open().cloned(),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "violation subscriber lagged, failures dropped");
                None
            }
        })
    }
}

impl FailureReporter for InProcessFailureBus {
    fn report(&self, failure: TimerFailure) {
        // send only fails with zero receivers; nobody is listening then.
        let _ = self.sender.send(failure);
    }
}
