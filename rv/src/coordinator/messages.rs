//! Message types exchanged with the Coordinator

use std::collections::BTreeMap;
use std::fmt;

use crate::resource::ConsumerVariant;

/// Token that starts a round; consumed once by the supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessSignal;

/// Report a consumer sends after acting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    pub consumer: ConsumerVariant,
}

impl CompletionMessage {
    pub fn new(consumer: ConsumerVariant) -> Self {
        Self { consumer }
    }
}

impl fmt::Display for CompletionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: rolled and smoked a cigarette", self.consumer)
    }
}

/// Why the coordinator left its round loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cancellation signal fired
    Cancelled,
    /// `max_rounds` rounds completed
    RoundLimit,
    /// A consumer closed its completion channel
    CompletionClosed(ConsumerVariant),
    /// The supplier stopped accepting readiness signals
    ReadinessRefused,
}

/// Summary of one run, returned once every actor has terminated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Completed rounds
    pub rounds: u64,
    /// Readiness signals the supplier accepted
    pub signals_sent: u64,
    /// Completed rounds per consumer
    pub completions: BTreeMap<ConsumerVariant, u64>,
    pub stop_reason: StopReason,
}

impl RunReport {
    pub fn completions_for(&self, consumer: ConsumerVariant) -> u64 {
        self.completions.get(&consumer).copied().unwrap_or(0)
    }

    /// Share of rounds completed by `consumer`, in `0.0..=1.0`
    pub fn share_of(&self, consumer: ConsumerVariant) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.completions_for(consumer) as f64 / self.rounds as f64
    }
}
