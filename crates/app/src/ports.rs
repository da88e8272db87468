//! Port definitions — traits that schedulers, targets and sinks implement.
//!
//! They are defined here (in `app`) so that the door side and the scheduler
//! side can both depend on them without depending on each other.

pub mod failure_reporter;
pub mod scheduler;

pub use failure_reporter::{FailureCause, FailureReporter, TimerFailure};
pub use scheduler::{CancelHook, Registration, Scheduler, TimerTarget};
