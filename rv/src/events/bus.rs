//! Event Bus - pub/sub for protocol events
//!
//! The EventBus uses a tokio broadcast channel to deliver events to all
//! subscribers. Actors emit through an [`EventEmitter`] bound to their id.

use tokio::sync::broadcast;
use tracing::debug;

use super::types::ProtocolEvent;
use crate::actor::ActorId;
use crate::resource::{ConsumerVariant, ResourceKind, ResourcePair};

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Central event bus for protocol activity
pub struct EventBus {
    tx: broadcast::Sender<ProtocolEvent>,
}

impl EventBus {
    /// Create a new event bus with the given capacity (at least one)
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// Fire-and-forget: with no subscribers the event is dropped, and slow
    /// subscribers lag rather than block the emitter.
    pub fn emit(&self, event: ProtocolEvent) {
        debug!(event_type = event.event_type(), "EventBus::emit");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ProtocolEvent> {
        debug!("EventBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Create an emitter handle for one actor
    pub fn emitter_for(&self, actor: ActorId) -> EventEmitter {
        debug!(%actor, "EventBus::emitter_for: creating emitter");
        EventEmitter {
            tx: self.tx.clone(),
            actor,
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Handle for an actor to emit events without owning the bus
#[derive(Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<ProtocolEvent>,
    actor: ActorId,
}

impl EventEmitter {
    /// Emit a raw event
    pub fn emit(&self, event: ProtocolEvent) {
        debug!(actor = %self.actor, event_type = event.event_type(), "EventEmitter::emit");
        let _ = self.tx.send(event);
    }

    // === Convenience methods ===

    pub fn round_started(&self, round: u64) {
        self.emit(ProtocolEvent::RoundStarted { round });
    }

    pub fn round_completed(&self, round: u64, consumer: ConsumerVariant) {
        self.emit(ProtocolEvent::RoundCompleted { round, consumer });
    }

    pub fn pair_supplied(&self, pair: ResourcePair) {
        self.emit(ProtocolEvent::PairSupplied { pair });
    }

    pub fn resource_supplied(&self, kind: ResourceKind) {
        self.emit(ProtocolEvent::ResourceSupplied { kind });
    }

    pub fn pair_matched(&self, pair: ResourcePair) {
        self.emit(ProtocolEvent::PairMatched {
            pair,
            consumer: pair.consumer(),
        });
    }

    pub fn resource_forwarded(&self, kind: ResourceKind, consumer: ConsumerVariant) {
        self.emit(ProtocolEvent::ResourceForwarded { kind, consumer });
    }

    pub fn consumer_acted(&self, consumer: ConsumerVariant) {
        self.emit(ProtocolEvent::ConsumerActed { consumer });
    }

    /// Emit this actor's stop event
    pub fn stopped(&self) {
        self.emit(ProtocolEvent::ActorStopped { actor: self.actor });
    }
}
