//! Event types for protocol observability
//!
//! Every step of a round is visible as an event:
//! - Round lifecycle (started, completed)
//! - Supply (pair chosen, each resource handed to the broker)
//! - Matching (pair matched, each resource forwarded to a consumer)
//! - Shutdown (each actor releasing its channels)

use crate::actor::ActorId;
use crate::resource::{ConsumerVariant, ResourceKind, ResourcePair};

/// Core event enum - the vocabulary of protocol activity
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolEvent {
    // === Round Lifecycle ===
    /// The coordinator is about to send a readiness signal
    RoundStarted { round: u64 },
    /// The coordinator received and logged a completion message
    RoundCompleted { round: u64, consumer: ConsumerVariant },

    // === Supply ===
    /// The supplier picked a pair for this round
    PairSupplied { pair: ResourcePair },
    /// The broker accepted one resource from the supplier
    ResourceSupplied { kind: ResourceKind },

    // === Matching ===
    /// The broker collected two resources and chose a consumer
    PairMatched { pair: ResourcePair, consumer: ConsumerVariant },
    /// A consumer accepted one resource from the broker
    ResourceForwarded { kind: ResourceKind, consumer: ConsumerVariant },
    /// A consumer holds all three kinds and acted
    ConsumerActed { consumer: ConsumerVariant },

    // === Shutdown ===
    /// An actor is terminating and releasing the channels it owns
    ActorStopped { actor: ActorId },
}

impl ProtocolEvent {
    /// Get the event type name (for filtering and logging)
    pub fn event_type(&self) -> &'static str {
        match self {
            ProtocolEvent::RoundStarted { .. } => "RoundStarted",
            ProtocolEvent::RoundCompleted { .. } => "RoundCompleted",
            ProtocolEvent::PairSupplied { .. } => "PairSupplied",
            ProtocolEvent::ResourceSupplied { .. } => "ResourceSupplied",
            ProtocolEvent::PairMatched { .. } => "PairMatched",
            ProtocolEvent::ResourceForwarded { .. } => "ResourceForwarded",
            ProtocolEvent::ConsumerActed { .. } => "ConsumerActed",
            ProtocolEvent::ActorStopped { .. } => "ActorStopped",
        }
    }
}
