//! Actor identity and task spawning

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::ProtocolError;
use crate::resource::ConsumerVariant;

/// Every participant in the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorId {
    Supplier,
    Broker,
    Consumer(ConsumerVariant),
    Coordinator,
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorId::Supplier => f.write_str("supplier"),
            ActorId::Broker => f.write_str("broker"),
            ActorId::Consumer(variant) => write!(f, "{}", variant),
            ActorId::Coordinator => f.write_str("coordinator"),
        }
    }
}

/// Join handle for a spawned actor task
pub struct ActorHandle {
    id: ActorId,
    handle: JoinHandle<Result<(), ProtocolError>>,
}

impl ActorHandle {
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Wait for the actor's termination acknowledgment
    pub async fn join(self) -> Result<(), ProtocolError> {
        debug!(actor = %self.id, "ActorHandle::join: called");
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(ProtocolError::ActorPanicked {
                actor: self.id,
                reason: e.to_string(),
            }),
        }
    }
}

/// Spawn an actor task
///
/// An actor that fails has hit an invariant violation. That is fatal for the
/// whole system, so the failure fires `cancel` before it is reported.
pub fn spawn_actor<F>(id: ActorId, cancel: CancellationToken, task: F) -> ActorHandle
where
    F: Future<Output = Result<(), ProtocolError>> + Send + 'static,
{
    debug!(actor = %id, "spawn_actor: called");
    let handle = tokio::spawn(async move {
        let result = task.await;
        if let Err(e) = &result {
            error!(actor = %id, error = %e, "{}: invariant violated, cancelling all actors", id);
            cancel.cancel();
        }
        result
    });
    ActorHandle { id, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;

    fn force_panic() -> bool {
        true
    }

    #[test]
    fn test_actor_names() {
        assert_eq!(ActorId::Supplier.to_string(), "supplier");
        assert_eq!(ActorId::Broker.to_string(), "broker");
        assert_eq!(ActorId::Consumer(ConsumerVariant::HasPapers).to_string(), "has-papers");
        assert_eq!(ActorId::Coordinator.to_string(), "coordinator");
    }

    #[tokio::test]
    async fn test_failed_actor_fires_cancellation() {
        let cancel = CancellationToken::new();
        let handle = spawn_actor(ActorId::Broker, cancel.clone(), async {
            Err::<(), _>(ProtocolError::DuplicateResource(ResourceKind::Lighter))
        });

        let result = handle.join().await;
        assert!(matches!(result, Err(ProtocolError::DuplicateResource(ResourceKind::Lighter))));
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_clean_actor_leaves_cancellation_alone() {
        let cancel = CancellationToken::new();
        let handle = spawn_actor(ActorId::Supplier, cancel.clone(), async { Ok::<(), ProtocolError>(()) });

        assert_eq!(handle.id(), ActorId::Supplier);
        assert!(handle.join().await.is_ok());
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_panicking_actor_is_reported() {
        let cancel = CancellationToken::new();
        let handle = spawn_actor(ActorId::Coordinator, cancel, async {
            if force_panic() {
                panic!("boom");
            }
            Ok::<(), ProtocolError>(())
        });

        let result = handle.join().await;
        assert!(matches!(
            result,
            Err(ProtocolError::ActorPanicked {
                actor: ActorId::Coordinator,
                ..
            })
        ));
    }
}
