//! Protocol event bus
//!
//! Actors emit an event at every protocol step onto a
//! `tokio::sync::broadcast` channel. Emitting never blocks and never fails,
//! so observers (tests, the binary's summary) cannot slow a round down.
//!
//! ```text
//!   Coordinator      Supplier            Broker              Consumers
//!   - RoundStarted   - PairSupplied      - PairMatched       - ConsumerActed
//!   - RoundCompleted - ResourceSupplied  - ResourceForwarded
//!         all of them: ActorStopped
//!                          ↓
//!                   ┌─────────────┐
//!                   │  EventBus   │ → subscribers
//!                   └─────────────┘
//! ```

mod bus;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventEmitter};
pub use types::ProtocolEvent;
