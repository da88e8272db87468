//! Scheduler implementations.
//!
//! - [`TokioScheduler`] runs each registration on its own tokio task.
//! - [`ManualScheduler`] keeps a virtual clock that only moves when told to.
//!
//! Both fire targets through [`fire`], which keeps a failing or panicking
//! target from escaping the scheduler.

mod manual;
mod tokio_scheduler;

pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::Utc;
use timed_door_domain::id::TimerId;

use crate::ports::{FailureCause, FailureReporter, TimerFailure, TimerTarget};

/// Invoke `target` and route any failure to `reporter`.
///
/// Returns `true` when the target completed without error.
fn fire<R: FailureReporter + ?Sized>(
    timer_id: TimerId,
    target: &dyn TimerTarget,
    reporter: &R,
) -> bool {
    let cause = match catch_unwind(AssertUnwindSafe(|| target.on_fired())) {
        Ok(Ok(())) => {
            tracing::debug!(%timer_id, "timer fired");
            return true;
        }
        Ok(Err(err)) => FailureCause::Returned(err),
        Err(payload) => FailureCause::Panicked(panic_message(payload.as_ref())),
    };
    tracing::warn!(%timer_id, error = %cause, "timer callback failed");
    reporter.report(TimerFailure {
        timer_id,
        fired_at: Utc::now(),
        cause,
    });
    false
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
