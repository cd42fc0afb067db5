//! `tcpip-forward` request handling.
//!
//! Decodes the bind request, consults the port policy, binds the listening
//! socket, replies synchronously with the bound port, and hands the socket
//! to a [`ListenerSupervisor`] that keeps serving it for the lifetime of the
//! parent connection.

use crate::connection::ConnectionContext;
use crate::listener::ListenerSupervisor;
use crate::policy::ForwardPolicy;
use portway_proto::messages::{BindRequest, BindResponse, RequestReply};
use std::io;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Handles `tcpip-forward` global requests.
#[derive(Debug, Clone, Default)]
pub struct TunnelRequestHandler {
    policy: ForwardPolicy,
}

impl TunnelRequestHandler {
    pub fn new(policy: ForwardPolicy) -> Self {
        Self { policy }
    }

    /// Handle one `tcpip-forward` request on `ctx`'s connection.
    ///
    /// The reply is produced before any connection is accepted. On success
    /// the accept loop runs in the background until the connection's
    /// cancellation fires or a fatal accept error ends the tunnel; every
    /// rejection closes the notification stream so the owning session loop
    /// terminates.
    pub async fn handle_forward_request(
        &self,
        ctx: &ConnectionContext,
        payload: &[u8],
    ) -> RequestReply {
        let Some(mut notify) = ctx.take_notifications().await else {
            // The connection's notification stream is gone: a tunnel already
            // owns it, or the session has ended.
            return RequestReply::deny(b"internal server error".to_vec());
        };

        let request = match BindRequest::decode(payload) {
            Ok(request) => request,
            Err(e) => {
                // Malformed requests are not worth explaining to the peer.
                debug!(error = %e, "undecodable tcpip-forward payload");
                notify.close();
                return RequestReply::deny(Vec::new());
            }
        };

        if !self.policy.allows(request.bind_port) {
            debug!(port = request.bind_port, "bind port refused by policy");
            notify.close();
            return RequestReply::deny(
                format!("forwarding {} not supported yet", request.bind_port).into_bytes(),
            );
        }

        let listener = match bind_listener(&request).await {
            Ok(listener) => listener,
            Err(e) => {
                warn!(
                    addr = %request.bind_addr,
                    port = request.bind_port,
                    error = %e,
                    "forward bind failed"
                );
                notify.close();
                return RequestReply::deny(Vec::new());
            }
        };

        // The effective port comes from the live socket: the request may
        // have asked for an ephemeral assignment (port 0).
        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                warn!(error = %e, "bound listener has no local address");
                notify.close();
                return RequestReply::deny(Vec::new());
            }
        };
        let bound_port = u32::from(local_addr.port());

        notify.send(format!("forwarding traffic from {local_addr}"));
        info!(addr = %local_addr, "tunnel listener bound");

        let supervisor = ListenerSupervisor::new(
            listener,
            request,
            bound_port,
            ctx.opener(),
            notify,
            ctx.cancellation(),
        );
        tokio::spawn(supervisor.run());

        RequestReply::accept(BindResponse { bound_port }.encode())
    }
}

/// Bind the requested listening socket. An empty bind address means all
/// interfaces; a port beyond the TCP range is a bind failure, not a policy
/// decision.
async fn bind_listener(request: &BindRequest) -> io::Result<TcpListener> {
    let port = u16::try_from(request.bind_port)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "bind port out of range"))?;
    let host = if request.bind_addr.is_empty() {
        "0.0.0.0"
    } else {
        request.bind_addr.as_str()
    };
    TcpListener::bind((host, port)).await
}
