//! Rendezvous channels
//!
//! tokio has no zero-capacity mpsc, so every hand-off carries a oneshot
//! acknowledgment and [`RendezvousSender::send`] resolves only once a
//! receiver has actually taken the value. A sender that stops waiting (its
//! future is dropped, e.g. by losing a `select!` to cancellation) drops the
//! acknowledgment, and the receiver discards that value unseen.
//!
//! Senders are not `Clone`: every channel has exactly one owner, and
//! dropping it is how that owner closes the channel.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why a blocking send or receive gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("cancellation fired")]
    Cancelled,

    #[error("channel closed")]
    Closed,
}

struct Handoff<T> {
    value: T,
    accepted: oneshot::Sender<()>,
}

/// Create a synchronous hand-off channel
pub fn rendezvous<T>() -> (RendezvousSender<T>, RendezvousReceiver<T>) {
    let (tx, rx) = mpsc::channel(1);
    (RendezvousSender { tx }, RendezvousReceiver { rx })
}

/// Sending half; dropping it closes the channel
pub struct RendezvousSender<T> {
    tx: mpsc::Sender<Handoff<T>>,
}

impl<T> RendezvousSender<T> {
    /// Block until a receiver takes `value`
    pub async fn send(&self, value: T) -> Result<(), Interrupted> {
        let (accepted, taken) = oneshot::channel();
        self.tx
            .send(Handoff { value, accepted })
            .await
            .map_err(|_| Interrupted::Closed)?;
        taken.await.map_err(|_| Interrupted::Closed)
    }

    /// Block until a receiver takes `value` or `cancel` fires
    pub async fn send_until(&self, value: T, cancel: &CancellationToken) -> Result<(), Interrupted> {
        if cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(Interrupted::Cancelled),
            sent = self.send(value) => sent,
        }
    }
}

/// Receiving half
pub struct RendezvousReceiver<T> {
    rx: mpsc::Receiver<Handoff<T>>,
}

impl<T> RendezvousReceiver<T> {
    /// Take the next value, or `None` once the sender is gone
    ///
    /// Cancel safe: nothing is awaited between taking a value off the queue
    /// and acknowledging it, so it can sit in a `select!` next to other
    /// branches without losing values.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            let handoff = self.rx.recv().await?;
            if handoff.accepted.send(()).is_ok() {
                return Some(handoff.value);
            }
            debug!("RendezvousReceiver::recv: sender abandoned hand-off, discarding");
        }
    }

    /// Take the next value unless `cancel` fires first
    pub async fn recv_until(&mut self, cancel: &CancellationToken) -> Result<T, Interrupted> {
        if cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(Interrupted::Cancelled),
            value = self.recv() => value.ok_or(Interrupted::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_send_waits_for_receiver() {
        let (tx, mut rx) = rendezvous::<u32>();

        let sender = tokio::spawn(async move { tx.send(7).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!sender.is_finished(), "send must not complete before a receive");

        assert_eq!(rx.recv().await, Some(7));
        assert_eq!(sender.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_recv_none_after_sender_dropped() {
        let (tx, mut rx) = rendezvous::<u32>();
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_to_dropped_receiver_fails() {
        let (tx, rx) = rendezvous::<u32>();
        drop(rx);
        assert_eq!(tx.send(1).await, Err(Interrupted::Closed));
    }

    #[tokio::test]
    async fn test_abandoned_send_is_never_received() {
        let (tx, mut rx) = rendezvous::<u32>();

        // The value is queued but the sender gives up before it is taken
        let abandoned = tokio::time::timeout(Duration::from_millis(20), tx.send(1)).await;
        assert!(abandoned.is_err());

        let sender = tokio::spawn(async move { tx.send(2).await });
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(sender.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_send_until_cancelled() {
        let (tx, _rx) = rendezvous::<u32>();
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        assert_eq!(tx.send_until(1, &cancel).await, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn test_recv_until_checks_cancellation_first() {
        let (tx, mut rx) = rendezvous::<u32>();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let _sender = tokio::spawn(async move { tx.send(1).await });
        assert_eq!(rx.recv_until(&cancel).await, Err(Interrupted::Cancelled));
    }
}
