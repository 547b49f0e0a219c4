//! Rendezvous - the cigarette smokers problem over synchronous channels
//!
//! A Supplier, a Broker and three Consumers run as independent tokio tasks
//! and meet only over rendezvous channels: a send completes when, and only
//! when, the receiver takes the value. A Coordinator paces rounds, collects
//! completions, and owns shutdown.
//!
//! # Core Concepts
//!
//! - **One Consumer Per Pair**: every Consumer holds one kind and needs the
//!   other two; each pair of distinct kinds names exactly one Consumer
//! - **No Shared State**: actors own their channel ends; closing a channel
//!   is dropping its sender
//! - **Cooperative Shutdown**: one cancellation token reaches every actor,
//!   and the Coordinator waits for all of them before returning
//!
//! # Modules
//!
//! - [`resource`] - Resource kinds, pairs and the matching rule
//! - [`channel`] - Zero-buffer hand-off channels
//! - [`topology`] - Who owns which end of which channel
//! - [`supplier`], [`broker`], [`consumer`], [`coordinator`] - The actors
//! - [`system`] - Wiring and running the whole protocol
//! - [`events`] - Protocol event bus
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod actor;
pub mod broker;
pub mod channel;
pub mod cli;
pub mod config;
pub mod consumer;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod resource;
pub mod supplier;
pub mod system;
pub mod topology;

// Re-export commonly used types
pub use actor::{ActorHandle, ActorId, spawn_actor};
pub use channel::{Interrupted, RendezvousReceiver, RendezvousSender, rendezvous};
pub use config::Config;
pub use coordinator::{CompletionMessage, Coordinator, CoordinatorConfig, ReadinessSignal, RunReport, StopReason};
pub use error::ProtocolError;
pub use events::{EventBus, EventEmitter, ProtocolEvent};
pub use resource::{ConsumerVariant, Lighter, Papers, Resource, ResourceKind, ResourcePair, Tobacco};
pub use system::{run, seeded_rng};
pub use topology::Topology;
