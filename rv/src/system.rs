//! System wiring - builds the topology, spawns every actor, runs the
//! coordinator to completion

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::actor::{ActorId, spawn_actor};
use crate::broker::Broker;
use crate::consumer::Consumer;
use crate::coordinator::{Coordinator, CoordinatorConfig, RunReport};
use crate::error::ProtocolError;
use crate::events::EventBus;
use crate::resource::ConsumerVariant;
use crate::supplier::Supplier;
use crate::topology::Topology;

/// The supplier's random source, seeded once
///
/// A fixed seed replays the same sequence of pairs; without one the
/// generator is seeded from the OS.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    debug!(?seed, "seeded_rng: called");
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Run the protocol until cancellation, the round limit, or a fatal error
///
/// Every actor gets its own task and a clone of `cancel`. This returns once
/// the coordinator has seen every actor terminate.
pub async fn run<R>(
    config: CoordinatorConfig,
    rng: R,
    cancel: CancellationToken,
    bus: &EventBus,
) -> Result<RunReport, ProtocolError>
where
    R: Rng + Send + 'static,
{
    debug!(?config, "run: called");
    let topology = Topology::build();

    // Build everything first so a construction error spawns nothing
    let supplier = Supplier::new(
        rng,
        topology.supplier,
        cancel.clone(),
        bus.emitter_for(ActorId::Supplier),
    );
    let broker = Broker::new(topology.broker, cancel.clone(), bus.emitter_for(ActorId::Broker));
    let has_tobacco = Consumer::new(
        topology.has_tobacco,
        cancel.clone(),
        bus.emitter_for(ActorId::Consumer(ConsumerVariant::HasTobacco)),
    )?;
    let has_papers = Consumer::new(
        topology.has_papers,
        cancel.clone(),
        bus.emitter_for(ActorId::Consumer(ConsumerVariant::HasPapers)),
    )?;
    let has_lighter = Consumer::new(
        topology.has_lighter,
        cancel.clone(),
        bus.emitter_for(ActorId::Consumer(ConsumerVariant::HasLighter)),
    )?;

    let actors = vec![
        spawn_actor(ActorId::Supplier, cancel.clone(), supplier.run()),
        spawn_actor(ActorId::Broker, cancel.clone(), broker.run()),
        spawn_actor(ActorId::Consumer(has_tobacco.variant()), cancel.clone(), has_tobacco.run()),
        spawn_actor(ActorId::Consumer(has_papers.variant()), cancel.clone(), has_papers.run()),
        spawn_actor(ActorId::Consumer(has_lighter.variant()), cancel.clone(), has_lighter.run()),
    ];
    info!(actors = actors.len(), "all actors spawned");

    let coordinator = Coordinator::new(
        config,
        topology.coordinator,
        actors,
        cancel,
        bus.emitter_for(ActorId::Coordinator),
    );

    match tokio::spawn(coordinator.run()).await {
        Ok(result) => result,
        Err(e) => Err(ProtocolError::ActorPanicked {
            actor: ActorId::Coordinator,
            reason: e.to_string(),
        }),
    }
}
