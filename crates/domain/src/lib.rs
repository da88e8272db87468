//! # timed-door-domain
//!
//! Pure domain model for a door that must not stay open longer than its
//! configured timeout.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define the validated [`Timeout`](timeout::Timeout) value
//! - Define the [`Door`](door::Door) state machine (`Locked` ⇄ `Open`)
//! - Define the violation raised when a door is found open
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app` or any async runtime.
//! Scheduling is expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod door;
pub mod timeout;

/// UTC timestamp used for `last_changed`, detection times and fire times.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
