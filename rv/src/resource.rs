//! Resource kinds, pairs, and the consumer variants they select
//!
//! The three kinds travel over typed channels as zero-sized tokens
//! ([`Tobacco`], [`Papers`], [`Lighter`]), so a consumer can only ever be
//! wired to the two kinds it does not hold. [`ResourcePair`] is the
//! two-of-three rule: each valid pair names exactly one [`ConsumerVariant`].

use std::fmt;

use rand::Rng;

use crate::error::ProtocolError;

/// One of the three resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Tobacco,
    Papers,
    Lighter,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Tobacco, ResourceKind::Papers, ResourceKind::Lighter];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Tobacco => "tobacco",
            ResourceKind::Papers => "papers",
            ResourceKind::Lighter => "lighter",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token that can be handed over a resource channel
pub trait Resource: fmt::Debug + Send + 'static {
    const KIND: ResourceKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tobacco;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Papers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lighter;

impl Resource for Tobacco {
    const KIND: ResourceKind = ResourceKind::Tobacco;
}

impl Resource for Papers {
    const KIND: ResourceKind = ResourceKind::Papers;
}

impl Resource for Lighter {
    const KIND: ResourceKind = ResourceKind::Lighter;
}

/// The consumer that already holds one kind and waits for the other two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConsumerVariant {
    HasTobacco,
    HasPapers,
    HasLighter,
}

impl ConsumerVariant {
    pub const ALL: [ConsumerVariant; 3] = [
        ConsumerVariant::HasTobacco,
        ConsumerVariant::HasPapers,
        ConsumerVariant::HasLighter,
    ];

    /// The consumer holding `kind`
    pub fn holding(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Tobacco => ConsumerVariant::HasTobacco,
            ResourceKind::Papers => ConsumerVariant::HasPapers,
            ResourceKind::Lighter => ConsumerVariant::HasLighter,
        }
    }

    /// The kind this consumer already holds and must never be sent
    pub fn holds(&self) -> ResourceKind {
        match self {
            ConsumerVariant::HasTobacco => ResourceKind::Tobacco,
            ConsumerVariant::HasPapers => ResourceKind::Papers,
            ConsumerVariant::HasLighter => ResourceKind::Lighter,
        }
    }

    /// The pair this consumer waits for
    pub fn needs(&self) -> ResourcePair {
        ResourcePair { holder: self.holds() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConsumerVariant::HasTobacco => "has-tobacco",
            ConsumerVariant::HasPapers => "has-papers",
            ConsumerVariant::HasLighter => "has-lighter",
        }
    }
}

impl fmt::Display for ConsumerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unordered pair of two distinct kinds
///
/// Stored as the kind that is *missing* from the pair, which is also the kind
/// held by the one consumer that can act on it. This makes `{a, b}` and
/// `{b, a}` the same value by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourcePair {
    holder: ResourceKind,
}

impl ResourcePair {
    pub const ALL: [ResourcePair; 3] = [
        ResourcePair {
            holder: ResourceKind::Tobacco,
        },
        ResourcePair {
            holder: ResourceKind::Lighter,
        },
        ResourcePair {
            holder: ResourceKind::Papers,
        },
    ];

    /// Form a pair from two deliveries
    ///
    /// Receiving the same kind twice is an invariant violation: the supplier
    /// only ever sends two distinct kinds per round.
    pub fn new(a: ResourceKind, b: ResourceKind) -> Result<Self, ProtocolError> {
        use ResourceKind::*;

        let holder = match (a, b) {
            (Papers, Lighter) | (Lighter, Papers) => Tobacco,
            (Tobacco, Lighter) | (Lighter, Tobacco) => Papers,
            (Tobacco, Papers) | (Papers, Tobacco) => Lighter,
            (kind, _) => return Err(ProtocolError::DuplicateResource(kind)),
        };
        Ok(Self { holder })
    }

    /// Pick one of the three pairs with uniform probability
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..3u8) {
            0 => Self::ALL[0],
            1 => Self::ALL[1],
            _ => Self::ALL[2],
        }
    }

    /// The two kinds, in the order the supplier hands them out
    pub fn kinds(&self) -> [ResourceKind; 2] {
        match self.holder {
            ResourceKind::Tobacco => [ResourceKind::Lighter, ResourceKind::Papers],
            ResourceKind::Papers => [ResourceKind::Lighter, ResourceKind::Tobacco],
            ResourceKind::Lighter => [ResourceKind::Tobacco, ResourceKind::Papers],
        }
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        kind != self.holder
    }

    /// The only consumer that can act on this pair
    pub fn consumer(&self) -> ConsumerVariant {
        ConsumerVariant::holding(self.holder)
    }
}

impl fmt::Display for ResourcePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.kinds();
        write!(f, "{} and {}", first, second)
    }
}
