//! # timed-door-app
//!
//! Application layer — the timed door and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** at the scheduling seam:
//!   - `TimerTarget` — something a scheduler can fire with no arguments
//!   - `Scheduler` — fire a target once after a delay
//!   - `FailureReporter` — where failed callbacks are delivered
//! - Provide the `DoorTimerAdapter` that turns a generic timer fire into a
//!   door check
//! - Provide the `TimedDoor` that arms a single debounced timer on unlock
//! - Provide **in-process infrastructure** that doesn't need IO: a tokio
//!   scheduler, a manually advanced scheduler, and the failure bus
//!
//! ## Dependency rule
//! Depends on `timed-door-domain` only (plus `tokio` for tasks and channels).
//! The scheduler side never sees door semantics; the door side never sees
//! how time passes.

pub mod door_timer_adapter;
pub mod failure_bus;
pub mod ports;
pub mod scheduler;
pub mod timed_door;
