//! Per-connection notification stream.
//!
//! An ordered, single-consumer stream of human-readable status lines
//! delivered to the requester's display session. The channel is unbounded
//! by choice: a slow or absent consumer must never stall the accept loop or
//! a data-copy loop, so the overflow policy is "grow" rather than block.
//!
//! Close discipline: the sender is not `Clone`, so exactly one task owns it
//! at a time, and only the owner of the terminal condition (the listener
//! supervisor, or the request handler on a rejected bind) closes it. A send
//! after close is silently dropped rather than a fault.

use tokio::sync::mpsc;

/// Create the notification stream for one connection.
pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NotificationSender { tx: Some(tx) }, NotificationReceiver { rx })
}

/// Producer half: queues status lines, never blocks.
#[derive(Debug)]
pub struct NotificationSender {
    tx: Option<mpsc::UnboundedSender<String>>,
}

impl NotificationSender {
    /// Queue a status line. Dropped silently once the stream is closed or
    /// the consumer has gone away.
    pub fn send(&self, msg: impl Into<String>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(msg.into());
        }
    }

    /// Close the stream: the consumer sees end-of-stream after draining
    /// queued lines. Idempotent.
    pub fn close(&mut self) {
        self.tx.take();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

/// Consumer half, held by the session display loop.
#[derive(Debug)]
pub struct NotificationReceiver {
    rx: mpsc::UnboundedReceiver<String>,
}

impl NotificationReceiver {
    /// Next status line, or `None` once the stream is closed and drained.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_order() {
        let (tx, mut rx) = notification_channel();
        tx.send("first");
        tx.send("second");
        tx.send("third");
        assert_eq!(rx.recv().await.as_deref(), Some("first"));
        assert_eq!(rx.recv().await.as_deref(), Some("second"));
        assert_eq!(rx.recv().await.as_deref(), Some("third"));
    }

    #[tokio::test]
    async fn close_ends_stream_after_drain() {
        let (mut tx, mut rx) = notification_channel();
        tx.send("last words");
        tx.close();
        assert_eq!(rx.recv().await.as_deref(), Some("last words"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn send_after_close_is_dropped() {
        let (mut tx, mut rx) = notification_channel();
        tx.close();
        tx.send("never seen");
        assert!(tx.is_closed());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (mut tx, mut rx) = notification_channel();
        tx.close();
        tx.close();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn send_without_consumer_does_not_block() {
        let (tx, rx) = notification_channel();
        drop(rx);
        for i in 0..10_000 {
            tx.send(format!("line {i}"));
        }
    }
}
