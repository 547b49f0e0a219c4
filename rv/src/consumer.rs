//! Consumer - one variant per held kind, waiting on the other two

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::channel::Interrupted;
use crate::coordinator::CompletionMessage;
use crate::error::ProtocolError;
use crate::events::EventEmitter;
use crate::resource::{ConsumerVariant, Resource, ResourcePair};
use crate::topology::ConsumerInbox;

/// A consumer waiting on kinds `A` and `B`
///
/// The variant is derived from the two type parameters, so a consumer can
/// only be built for a pair it is allowed to receive.
pub struct Consumer<A, B> {
    variant: ConsumerVariant,
    inbox: ConsumerInbox<A, B>,
    cancel: CancellationToken,
    events: EventEmitter,
}

impl<A: Resource, B: Resource> Consumer<A, B> {
    pub fn new(inbox: ConsumerInbox<A, B>, cancel: CancellationToken, events: EventEmitter) -> Result<Self, ProtocolError> {
        let variant = ResourcePair::new(A::KIND, B::KIND)?.consumer();
        debug!(%variant, "Consumer::new: called");
        Ok(Self {
            variant,
            inbox,
            cancel,
            events,
        })
    }

    pub fn variant(&self) -> ConsumerVariant {
        self.variant
    }

    /// Act once per delivered pair until cancelled or the broker hangs up
    pub async fn run(mut self) -> Result<(), ProtocolError> {
        debug!(variant = %self.variant, "Consumer::run: called");

        loop {
            if let Err(reason) = self.gather().await {
                debug!(variant = %self.variant, %reason, "Consumer::run: stopped gathering");
                break;
            }

            self.events.consumer_acted(self.variant);
            let message = CompletionMessage::new(self.variant);

            if let Err(reason) = self.inbox.completions.send_until(message, &self.cancel).await {
                debug!(variant = %self.variant, %reason, "Consumer::run: completion not delivered");
                break;
            }
        }

        if self.cancel.is_cancelled() {
            self.await_broker().await;
        }
        self.shutdown();
        Ok(())
    }

    /// Wait for the broker to close both feeds before closing completions
    async fn await_broker(&mut self) {
        debug!(variant = %self.variant, "Consumer::await_broker: called");
        let inbox = &mut self.inbox;
        let (mut first, mut second) = (true, true);
        while first || second {
            tokio::select! {
                a = inbox.first.recv(), if first => first = a.is_some(),
                b = inbox.second.recv(), if second => second = b.is_some(),
            }
        }
    }

    /// Wait for one of each kind, in whatever order they arrive
    async fn gather(&mut self) -> Result<(), Interrupted> {
        let (mut has_first, mut has_second) = (false, false);

        while !(has_first && has_second) {
            if self.cancel.is_cancelled() {
                return Err(Interrupted::Cancelled);
            }

            let inbox = &mut self.inbox;
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(Interrupted::Cancelled),
                first = inbox.first.recv(), if !has_first => {
                    first.ok_or(Interrupted::Closed)?;
                    has_first = true;
                }
                second = inbox.second.recv(), if !has_second => {
                    second.ok_or(Interrupted::Closed)?;
                    has_second = true;
                }
            }
        }
        Ok(())
    }

    /// Close the completion channel
    fn shutdown(self) {
        self.events.stopped();
        info!("{}: shutdown complete", self.variant);
        drop(self.inbox);
    }
}
