//! Per-connection state handed to the tunnel core by the transport layer.
//!
//! One `ConnectionContext` exists per authenticated connection, created by
//! the host once the transport has finished its handshake. It carries the
//! three things every tunnel task needs: the handle for opening logical
//! channels, the connection's cancellation token, and the single
//! notification sender consumed by the first accepted tunnel.

use crate::notify::{notification_channel, NotificationReceiver, NotificationSender};
use portway_proto::transport::ChannelOpener;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Context for one authenticated transport connection.
pub struct ConnectionContext {
    opener: Arc<dyn ChannelOpener>,
    cancel: CancellationToken,
    notifications: Mutex<Option<NotificationSender>>,
}

impl ConnectionContext {
    /// Build the context for a new connection.
    ///
    /// Returns the context plus the notification receiver the host should
    /// hand to the session display loop. The transport layer must cancel
    /// `cancel` when the connection ends; that is the single cancellation
    /// source for every tunnel on this connection.
    pub fn new(
        opener: Arc<dyn ChannelOpener>,
        cancel: CancellationToken,
    ) -> (Self, NotificationReceiver) {
        let (tx, rx) = notification_channel();
        (
            Self {
                opener,
                cancel,
                notifications: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    pub fn opener(&self) -> Arc<dyn ChannelOpener> {
        Arc::clone(&self.opener)
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Take ownership of the connection's notification sender.
    ///
    /// The stream exists once per connection; the first accepted tunnel
    /// takes it and owns the close. Returns `None` if already taken.
    pub(crate) async fn take_notifications(&self) -> Option<NotificationSender> {
        self.notifications.lock().await.take()
    }
}
