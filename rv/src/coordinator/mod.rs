//! Coordinator for round pacing and shutdown
//!
//! The Coordinator owns the protocol's cadence and its lifetime:
//! - **Idle:** hand one readiness signal to the supplier
//! - **AwaitingCompletion:** multi-way receive over the three consumers'
//!   completion channels and the cancellation signal
//! - **Stopped:** close the readiness channel, stop reading completions,
//!   and wait for every actor to acknowledge termination

mod config;
mod core;
mod messages;

pub use config::{CoordinatorConfig, DEFAULT_PACING_DELAY};
pub use core::{Coordinator, CoordinatorState};
pub use messages::{CompletionMessage, ReadinessSignal, RunReport, StopReason};
