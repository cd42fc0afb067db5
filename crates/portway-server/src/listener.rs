//! Tunnel listener supervision.
//!
//! A [`ListenerSupervisor`] owns one bound socket for the life of its tunnel
//! and runs the accept loop. Each accepted socket is announced to the peer
//! as a `forwarded-tcpip` channel open and relayed by a spawned
//! [`ChannelRelay`] task. The loop ends on the parent connection's
//! cancellation or on a fatal accept error; either way the supervisor, and
//! only the supervisor, closes the notification stream, exactly once.

use crate::notify::NotificationSender;
use crate::relay::ChannelRelay;
use portway_proto::messages::{BindRequest, ForwardedTcpip};
use portway_proto::transport::ChannelOpener;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Owns one tunnel's listening socket and accept loop.
pub struct ListenerSupervisor {
    listener: TcpListener,
    request: BindRequest,
    bound_port: u32,
    opener: Arc<dyn ChannelOpener>,
    notify: NotificationSender,
    cancel: CancellationToken,
}

impl ListenerSupervisor {
    pub(crate) fn new(
        listener: TcpListener,
        request: BindRequest,
        bound_port: u32,
        opener: Arc<dyn ChannelOpener>,
        notify: NotificationSender,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            listener,
            request,
            bound_port,
            opener,
            notify,
            cancel,
        }
    }

    /// Run the accept loop until the parent connection ends or a fatal
    /// accept error occurs. Consumes the supervisor; the listening socket
    /// closes when it returns. Established relays are left to drain on
    /// their own.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(port = self.bound_port, "parent connection ended, closing tunnel listener");
                    break;
                }
                result = self.listener.accept() => match result {
                    Ok((stream, peer)) => self.serve_connection(stream, peer).await,
                    Err(e) if is_transient(&e) => {
                        debug!(port = self.bound_port, error = %e, "transient accept error, retrying");
                    }
                    Err(e) => {
                        warn!(port = self.bound_port, error = %e, "fatal accept error, ending tunnel");
                        self.notify.send(format!(
                            "error occurred while processing: failed to accept new connection: {e}"
                        ));
                        break;
                    }
                }
            }
        }

        // Exactly one close per tunnel lifetime, whatever ended the loop.
        // The owning session takes this as "no more status updates".
        self.notify.close();
        debug!(port = self.bound_port, "accept loop ended");
    }

    /// Announce one accepted socket and hand it to a relay task. A failed
    /// channel open is local to this socket; the listener keeps serving.
    async fn serve_connection(&self, stream: TcpStream, peer: SocketAddr) {
        self.notify
            .send(format!("accepted connection from {}:{}", peer.ip(), peer.port()));

        let forward = ForwardedTcpip {
            dest_addr: self.request.bind_addr.clone(),
            dest_port: self.bound_port,
            origin_addr: peer.ip().to_string(),
            origin_port: u32::from(peer.port()),
        };

        match self.opener.open_forwarded(&forward).await {
            Ok(channel) => {
                debug!(peer = %peer, port = self.bound_port, "forwarded channel opened");
                tokio::spawn(ChannelRelay::new(stream, channel).run());
            }
            Err(e) => {
                warn!(peer = %peer, error = %e, "failed to open forwarded channel");
                self.notify
                    .send(format!("error occurred while processing: {e}"));
                // Dropping `stream` closes the accepted socket.
            }
        }
    }
}

/// Accept errors the transport layer classifies as timeout/temporary are
/// swallowed and retried; anything else ends the tunnel.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
