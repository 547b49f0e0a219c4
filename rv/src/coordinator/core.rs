//! Main Coordinator task implementation

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::config::CoordinatorConfig;
use super::messages::{ReadinessSignal, RunReport, StopReason};
use crate::actor::ActorHandle;
use crate::channel::Interrupted;
use crate::error::ProtocolError;
use crate::events::EventEmitter;
use crate::resource::ConsumerVariant;
use crate::topology::CoordinatorEndpoints;

/// Coordinator states; `Stopped` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    AwaitingCompletion,
    Stopped(StopReason),
}

/// Paces rounds, aggregates completions, and owns shutdown
pub struct Coordinator {
    config: CoordinatorConfig,
    endpoints: CoordinatorEndpoints,
    /// Every other actor, joined once stopped
    actors: Vec<ActorHandle>,
    cancel: CancellationToken,
    events: EventEmitter,
    rounds: u64,
    signals_sent: u64,
    completions: BTreeMap<ConsumerVariant, u64>,
}

impl Coordinator {
    pub fn new(
        config: CoordinatorConfig,
        endpoints: CoordinatorEndpoints,
        actors: Vec<ActorHandle>,
        cancel: CancellationToken,
        events: EventEmitter,
    ) -> Self {
        debug!(?config, actors = actors.len(), "Coordinator::new: called");
        Self {
            config,
            endpoints,
            actors,
            cancel,
            events,
            rounds: 0,
            signals_sent: 0,
            completions: BTreeMap::new(),
        }
    }

    /// Run rounds until stopped, then wait for every actor to terminate
    ///
    /// This consumes the Coordinator. The report is only returned once all
    /// actors have acknowledged termination; the first actor failure is
    /// returned instead if there was one.
    pub async fn run(mut self) -> Result<RunReport, ProtocolError> {
        debug!("Coordinator::run: called");
        let mut state = CoordinatorState::Idle;

        let reason = loop {
            state = match state {
                CoordinatorState::Idle => self.signal_ready().await,
                CoordinatorState::AwaitingCompletion => self.await_completion().await,
                CoordinatorState::Stopped(reason) => break reason,
            };
            debug!(?state, "Coordinator::run: transitioned");
        };

        self.stop(reason).await
    }

    /// Idle: hand one readiness signal to the supplier
    async fn signal_ready(&mut self) -> CoordinatorState {
        if self.cancel.is_cancelled() {
            return CoordinatorState::Stopped(StopReason::Cancelled);
        }

        let round = self.rounds + 1;
        debug!(round, "Coordinator::signal_ready: called");
        self.events.round_started(round);

        match self.endpoints.readiness.send_until(ReadinessSignal, &self.cancel).await {
            Ok(()) => {
                self.signals_sent += 1;
                CoordinatorState::AwaitingCompletion
            }
            Err(Interrupted::Cancelled) => CoordinatorState::Stopped(StopReason::Cancelled),
            Err(Interrupted::Closed) => {
                warn!("coordinator: supplier stopped accepting readiness signals");
                CoordinatorState::Stopped(StopReason::ReadinessRefused)
            }
        }
    }

    /// AwaitingCompletion: whichever consumer reports first, or cancellation
    async fn await_completion(&mut self) -> CoordinatorState {
        if self.cancel.is_cancelled() {
            return CoordinatorState::Stopped(StopReason::Cancelled);
        }

        let (channel, received) = tokio::select! {
            _ = self.cancel.cancelled() => return CoordinatorState::Stopped(StopReason::Cancelled),
            msg = self.endpoints.has_tobacco.recv() => (ConsumerVariant::HasTobacco, msg),
            msg = self.endpoints.has_papers.recv() => (ConsumerVariant::HasPapers, msg),
            msg = self.endpoints.has_lighter.recv() => (ConsumerVariant::HasLighter, msg),
        };

        let Some(message) = received else {
            warn!(consumer = %channel, "coordinator: completion channel closed");
            return CoordinatorState::Stopped(StopReason::CompletionClosed(channel));
        };

        // A completion racing the cancellation signal is dropped, not logged
        if self.cancel.is_cancelled() {
            debug!(%message, "Coordinator::await_completion: cancelled, discarding");
            return CoordinatorState::Stopped(StopReason::Cancelled);
        }

        info!("{}", message);
        self.rounds += 1;
        *self.completions.entry(message.consumer).or_insert(0) += 1;
        self.events.round_completed(self.rounds, message.consumer);

        if self.config.limit_reached(self.rounds) {
            info!(rounds = self.rounds, "coordinator: round limit reached");
            return CoordinatorState::Stopped(StopReason::RoundLimit);
        }

        if self.pace().await {
            CoordinatorState::Idle
        } else {
            CoordinatorState::Stopped(StopReason::Cancelled)
        }
    }

    /// Sleep the pacing delay; false if cancelled meanwhile
    async fn pace(&self) -> bool {
        if self.config.pacing_delay.is_zero() {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(self.config.pacing_delay) => true,
        }
    }

    /// Stopped: release our channels, then wait for everyone else
    async fn stop(self, reason: StopReason) -> Result<RunReport, ProtocolError> {
        debug!(?reason, "Coordinator::stop: called");
        let Self {
            endpoints,
            actors,
            events,
            rounds,
            signals_sent,
            completions,
            ..
        } = self;

        // Closing readiness lets the supplier finish even without cancellation;
        // its closed channels then cascade down the ring.
        drop(endpoints);
        info!("coordinator: stopped reading messages");

        let mut failure = None;
        for actor in actors {
            let id = actor.id();
            match actor.join().await {
                Ok(()) => debug!(actor = %id, "Coordinator::stop: actor terminated"),
                Err(e) => {
                    error!(actor = %id, error = %e, "coordinator: actor failed");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        events.stopped();
        info!("coordinator: shutdown complete");

        match failure {
            Some(e) => Err(e),
            None => Ok(RunReport {
                rounds,
                signals_sent,
                completions,
                stop_reason: reason,
            }),
        }
    }
}
