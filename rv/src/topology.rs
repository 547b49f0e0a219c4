//! Channel topology
//!
//! The protocol is a ring: coordinator → supplier → broker → consumers →
//! coordinator. [`Topology::build`] creates every edge of that ring once, at
//! startup, and hands each actor exactly the endpoints it owns. The sending
//! side of an edge is always the side that closes it (by being dropped when
//! its actor terminates); [`EDGES`] documents that ownership.

use crate::actor::ActorId;
use crate::channel::{RendezvousReceiver, RendezvousSender, rendezvous};
use crate::coordinator::{CompletionMessage, ReadinessSignal};
use crate::resource::{ConsumerVariant, Lighter, Papers, Resource, Tobacco};

/// One directed channel in the topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub name: &'static str,
    pub sender: ActorId,
    pub receiver: ActorId,
    pub closed_by: ActorId,
}

const fn edge(name: &'static str, sender: ActorId, receiver: ActorId) -> Edge {
    Edge {
        name,
        sender,
        receiver,
        closed_by: sender,
    }
}

const HAS_TOBACCO: ActorId = ActorId::Consumer(ConsumerVariant::HasTobacco);
const HAS_PAPERS: ActorId = ActorId::Consumer(ConsumerVariant::HasPapers);
const HAS_LIGHTER: ActorId = ActorId::Consumer(ConsumerVariant::HasLighter);

/// Every channel, its endpoints, and who closes it
pub const EDGES: [Edge; 13] = [
    edge("readiness", ActorId::Coordinator, ActorId::Supplier),
    edge("supply.tobacco", ActorId::Supplier, ActorId::Broker),
    edge("supply.papers", ActorId::Supplier, ActorId::Broker),
    edge("supply.lighter", ActorId::Supplier, ActorId::Broker),
    edge("has-tobacco.papers", ActorId::Broker, HAS_TOBACCO),
    edge("has-tobacco.lighter", ActorId::Broker, HAS_TOBACCO),
    edge("has-papers.tobacco", ActorId::Broker, HAS_PAPERS),
    edge("has-papers.lighter", ActorId::Broker, HAS_PAPERS),
    edge("has-lighter.tobacco", ActorId::Broker, HAS_LIGHTER),
    edge("has-lighter.papers", ActorId::Broker, HAS_LIGHTER),
    edge("has-tobacco.completions", HAS_TOBACCO, ActorId::Coordinator),
    edge("has-papers.completions", HAS_PAPERS, ActorId::Coordinator),
    edge("has-lighter.completions", HAS_LIGHTER, ActorId::Coordinator),
];

/// Coordinator side: readiness out, completions in
pub struct CoordinatorEndpoints {
    pub readiness: RendezvousSender<ReadinessSignal>,
    pub has_tobacco: RendezvousReceiver<CompletionMessage>,
    pub has_papers: RendezvousReceiver<CompletionMessage>,
    pub has_lighter: RendezvousReceiver<CompletionMessage>,
}

/// Supplier side: readiness in, one supply channel per kind out
pub struct SupplierEndpoints {
    pub readiness: RendezvousReceiver<ReadinessSignal>,
    pub tobacco: RendezvousSender<Tobacco>,
    pub papers: RendezvousSender<Papers>,
    pub lighter: RendezvousSender<Lighter>,
}

/// The broker's private pair of channels into one consumer
pub struct ConsumerFeed<A, B> {
    pub first: RendezvousSender<A>,
    pub second: RendezvousSender<B>,
}

/// Broker side: one receiver per kind in, a feed per consumer out
pub struct BrokerEndpoints {
    pub tobacco: RendezvousReceiver<Tobacco>,
    pub papers: RendezvousReceiver<Papers>,
    pub lighter: RendezvousReceiver<Lighter>,
    pub has_tobacco: ConsumerFeed<Papers, Lighter>,
    pub has_papers: ConsumerFeed<Tobacco, Lighter>,
    pub has_lighter: ConsumerFeed<Tobacco, Papers>,
}

/// Consumer side: its two kinds in, completion messages out
pub struct ConsumerInbox<A, B> {
    pub first: RendezvousReceiver<A>,
    pub second: RendezvousReceiver<B>,
    pub completions: RendezvousSender<CompletionMessage>,
}

/// All endpoints of the ring, grouped by owning actor
pub struct Topology {
    pub coordinator: CoordinatorEndpoints,
    pub supplier: SupplierEndpoints,
    pub broker: BrokerEndpoints,
    pub has_tobacco: ConsumerInbox<Papers, Lighter>,
    pub has_papers: ConsumerInbox<Tobacco, Lighter>,
    pub has_lighter: ConsumerInbox<Tobacco, Papers>,
}

impl Topology {
    pub fn build() -> Self {
        let (readiness_tx, readiness_rx) = rendezvous();

        let (supply_tobacco_tx, supply_tobacco_rx) = rendezvous();
        let (supply_papers_tx, supply_papers_rx) = rendezvous();
        let (supply_lighter_tx, supply_lighter_rx) = rendezvous();

        let (has_tobacco_feed, has_tobacco_done, has_tobacco) = consumer_edges::<Papers, Lighter>();
        let (has_papers_feed, has_papers_done, has_papers) = consumer_edges::<Tobacco, Lighter>();
        let (has_lighter_feed, has_lighter_done, has_lighter) = consumer_edges::<Tobacco, Papers>();

        Self {
            coordinator: CoordinatorEndpoints {
                readiness: readiness_tx,
                has_tobacco: has_tobacco_done,
                has_papers: has_papers_done,
                has_lighter: has_lighter_done,
            },
            supplier: SupplierEndpoints {
                readiness: readiness_rx,
                tobacco: supply_tobacco_tx,
                papers: supply_papers_tx,
                lighter: supply_lighter_tx,
            },
            broker: BrokerEndpoints {
                tobacco: supply_tobacco_rx,
                papers: supply_papers_rx,
                lighter: supply_lighter_rx,
                has_tobacco: has_tobacco_feed,
                has_papers: has_papers_feed,
                has_lighter: has_lighter_feed,
            },
            has_tobacco,
            has_papers,
            has_lighter,
        }
    }
}

/// Broker → consumer and consumer → coordinator edges for one consumer
fn consumer_edges<A: Resource, B: Resource>() -> (
    ConsumerFeed<A, B>,
    RendezvousReceiver<CompletionMessage>,
    ConsumerInbox<A, B>,
) {
    let (first_tx, first_rx) = rendezvous();
    let (second_tx, second_rx) = rendezvous();
    let (completions_tx, completions_rx) = rendezvous();

    (
        ConsumerFeed {
            first: first_tx,
            second: second_tx,
        },
        completions_rx,
        ConsumerInbox {
            first: first_rx,
            second: second_rx,
            completions: completions_tx,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_edge_closed_by_its_sender() {
        for edge in EDGES {
            assert_eq!(edge.closed_by, edge.sender, "{}", edge.name);
            assert_ne!(edge.sender, edge.receiver, "{}", edge.name);
        }
    }

    #[test]
    fn test_consumers_never_fed_their_own_kind() {
        for variant in ConsumerVariant::ALL {
            let own = format!("{}.{}", variant, variant.holds());
            assert!(EDGES.iter().all(|e| e.name != own), "{} is fed its own kind", variant);

            let feeds = EDGES
                .iter()
                .filter(|e| e.sender == ActorId::Broker && e.receiver == ActorId::Consumer(variant))
                .count();
            assert_eq!(feeds, 2);
        }
    }

    #[test]
    fn test_ring_is_closed() {
        // Each actor both receives from and sends to some other actor
        let actors = [
            ActorId::Coordinator,
            ActorId::Supplier,
            ActorId::Broker,
            HAS_TOBACCO,
            HAS_PAPERS,
            HAS_LIGHTER,
        ];
        for actor in actors {
            assert!(EDGES.iter().any(|e| e.sender == actor), "{} never sends", actor);
            assert!(EDGES.iter().any(|e| e.receiver == actor), "{} never receives", actor);
        }
    }

    #[tokio::test]
    async fn test_built_endpoints_are_connected() {
        let Topology {
            broker, mut has_papers, ..
        } = Topology::build();

        let sender = tokio::spawn(async move { broker.has_papers.first.send(Tobacco).await });
        assert_eq!(has_papers.first.recv().await, Some(Tobacco));
        assert!(sender.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_dropping_supplier_closes_supply() {
        let mut topology = Topology::build();
        drop(topology.supplier);

        assert!(topology.broker.tobacco.recv().await.is_none());
        assert!(topology.broker.papers.recv().await.is_none());
        assert!(topology.broker.lighter.recv().await.is_none());
    }
}
