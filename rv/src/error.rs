//! Protocol errors
//!
//! Only invariant violations are errors. An actor unwinding because
//! cancellation fired or a peer closed its channel is a normal shutdown.

use thiserror::Error;

use crate::actor::ActorId;
use crate::resource::ResourceKind;

/// Fatal conditions that stop the whole system
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("received {0} twice in one round")]
    DuplicateResource(ResourceKind),

    #[error("{actor} terminated abnormally: {reason}")]
    ActorPanicked { actor: ActorId, reason: String },
}
