//! Supplier - answers each readiness signal with a random pair of resources

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::channel::Interrupted;
use crate::error::ProtocolError;
use crate::events::EventEmitter;
use crate::resource::{Lighter, Papers, ResourceKind, ResourcePair, Tobacco};
use crate::topology::SupplierEndpoints;

/// Leaf actor feeding the broker
///
/// The random source is handed in already seeded, so tests can substitute a
/// fixed seed and the binary seeds exactly once at start-up.
pub struct Supplier<R> {
    rng: R,
    endpoints: SupplierEndpoints,
    cancel: CancellationToken,
    events: EventEmitter,
}

impl<R: Rng + Send> Supplier<R> {
    pub fn new(rng: R, endpoints: SupplierEndpoints, cancel: CancellationToken, events: EventEmitter) -> Self {
        debug!("Supplier::new: called");
        Self {
            rng,
            endpoints,
            cancel,
            events,
        }
    }

    /// Serve readiness signals until cancelled or the coordinator hangs up
    pub async fn run(mut self) -> Result<(), ProtocolError> {
        debug!("Supplier::run: called");

        loop {
            if let Err(reason) = self.endpoints.readiness.recv_until(&self.cancel).await {
                debug!(%reason, "Supplier::run: no more readiness signals");
                break;
            }

            let pair = ResourcePair::random(&mut self.rng);
            info!("supplier: sending {}", pair);
            self.events.pair_supplied(pair);

            if let Err(reason) = Self::deliver(&self.endpoints, &self.cancel, &self.events, pair).await {
                debug!(%pair, %reason, "Supplier::run: delivery abandoned");
                break;
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Hand both resources to the broker, one at a time
    ///
    /// Borrows only the channel ends, so the random source never has to be
    /// shared across threads while a delivery is pending.
    async fn deliver(
        endpoints: &SupplierEndpoints,
        cancel: &CancellationToken,
        events: &EventEmitter,
        pair: ResourcePair,
    ) -> Result<(), Interrupted> {
        for kind in pair.kinds() {
            match kind {
                ResourceKind::Tobacco => endpoints.tobacco.send_until(Tobacco, cancel).await?,
                ResourceKind::Papers => endpoints.papers.send_until(Papers, cancel).await?,
                ResourceKind::Lighter => endpoints.lighter.send_until(Lighter, cancel).await?,
            }
            events.resource_supplied(kind);
        }
        Ok(())
    }

    /// Close all three supply channels, used or not
    fn shutdown(self) {
        self.events.stopped();
        info!("supplier: shutdown complete");
        drop(self.endpoints);
    }
}
