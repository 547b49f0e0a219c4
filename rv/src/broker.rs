//! Broker - matches each pair of supplied resources to the one consumer
//! that can use it
//!
//! Per round the broker takes exactly two deliveries (whichever arrive
//! first, chosen without bias by `select!`), applies the two-of-three rule,
//! and forwards both resources over that consumer's private channels. It
//! never takes a third delivery before the round's forwards are done.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::channel::Interrupted;
use crate::error::ProtocolError;
use crate::events::EventEmitter;
use crate::resource::{ConsumerVariant, Lighter, Papers, Resource, ResourceKind, ResourcePair, Tobacco};
use crate::topology::{BrokerEndpoints, ConsumerFeed};

pub struct Broker {
    endpoints: BrokerEndpoints,
    cancel: CancellationToken,
    events: EventEmitter,
}

impl Broker {
    pub fn new(endpoints: BrokerEndpoints, cancel: CancellationToken, events: EventEmitter) -> Self {
        debug!("Broker::new: called");
        Self {
            endpoints,
            cancel,
            events,
        }
    }

    /// Match rounds until cancelled or a neighbour hangs up
    ///
    /// Collecting the same kind twice means the supplier broke the protocol;
    /// that is returned as an error, after the broker's channels are closed.
    pub async fn run(mut self) -> Result<(), ProtocolError> {
        debug!("Broker::run: called");

        let result = loop {
            let pair = match self.collect().await {
                Ok(Ok(pair)) => pair,
                Ok(Err(reason)) => {
                    debug!(%reason, "Broker::run: stopped collecting");
                    break Ok(());
                }
                Err(e) => break Err(e),
            };

            debug!(%pair, consumer = %pair.consumer(), "Broker::run: matched");
            self.events.pair_matched(pair);

            if let Err(reason) = self.forward(pair).await {
                debug!(%pair, %reason, "Broker::run: forward abandoned");
                break Ok(());
            }
        };

        if result.is_ok() && self.cancel.is_cancelled() {
            self.await_supplier().await;
        }
        self.shutdown();
        result
    }

    /// Take exactly two deliveries and pair them
    async fn collect(&mut self) -> Result<Result<ResourcePair, Interrupted>, ProtocolError> {
        let first = match self.take_one().await {
            Ok(kind) => kind,
            Err(reason) => return Ok(Err(reason)),
        };
        let second = match self.take_one().await {
            Ok(kind) => kind,
            Err(reason) => return Ok(Err(reason)),
        };
        ResourcePair::new(first, second).map(Ok)
    }

    /// Wait for whichever kind arrives next
    async fn take_one(&mut self) -> Result<ResourceKind, Interrupted> {
        if self.cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }

        let supply = &mut self.endpoints;
        let kind = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Interrupted::Cancelled),
            t = supply.tobacco.recv() => t.map(|Tobacco| ResourceKind::Tobacco),
            p = supply.papers.recv() => p.map(|Papers| ResourceKind::Papers),
            l = supply.lighter.recv() => l.map(|Lighter| ResourceKind::Lighter),
        };
        kind.ok_or(Interrupted::Closed)
    }

    /// Forward the matched pair to its consumer
    async fn forward(&self, pair: ResourcePair) -> Result<(), Interrupted> {
        let consumer = pair.consumer();
        let endpoints = &self.endpoints;
        match consumer {
            ConsumerVariant::HasTobacco => self.hand_over(&endpoints.has_tobacco, Papers, Lighter, consumer).await,
            ConsumerVariant::HasPapers => self.hand_over(&endpoints.has_papers, Tobacco, Lighter, consumer).await,
            ConsumerVariant::HasLighter => self.hand_over(&endpoints.has_lighter, Tobacco, Papers, consumer).await,
        }
    }

    async fn hand_over<A: Resource, B: Resource>(
        &self,
        feed: &ConsumerFeed<A, B>,
        first: A,
        second: B,
        consumer: ConsumerVariant,
    ) -> Result<(), Interrupted> {
        feed.first.send_until(first, &self.cancel).await?;
        self.events.resource_forwarded(A::KIND, consumer);
        feed.second.send_until(second, &self.cancel).await?;
        self.events.resource_forwarded(B::KIND, consumer);
        Ok(())
    }

    /// Wait for the supplier to close its side before closing ours
    ///
    /// Anything still on offer is taken and dropped. The supplier is
    /// cancelled too, so each channel closes within one of its steps.
    async fn await_supplier(&mut self) {
        debug!("Broker::await_supplier: called");
        let supply = &mut self.endpoints;
        let (mut tobacco, mut papers, mut lighter) = (true, true, true);
        while tobacco || papers || lighter {
            tokio::select! {
                t = supply.tobacco.recv(), if tobacco => tobacco = t.is_some(),
                p = supply.papers.recv(), if papers => papers = p.is_some(),
                l = supply.lighter.recv(), if lighter => lighter = l.is_some(),
            }
        }
    }

    /// Close every consumer feed
    fn shutdown(self) {
        self.events.stopped();
        info!("broker: shutdown complete");
        drop(self.endpoints);
    }
}
