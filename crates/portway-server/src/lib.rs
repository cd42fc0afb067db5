//! portway-server: the tunnel lifecycle and relay subsystem.
//!
//! Implements the server side of `tcpip-forward`-style remote port
//! forwarding over an already-authenticated multiplexed transport: a peer
//! asks for a port to be bound on the server, every socket accepted on that
//! port is announced as a `forwarded-tcpip` channel open, and bytes are
//! relayed both ways until either side closes. Human-readable status lines
//! flow to the requester's display session through a per-connection
//! notification stream.
//!
//! The secure transport itself (handshake, encryption, channel framing) is
//! an external collaborator reached through
//! [`portway_proto::transport::ChannelOpener`]; process bootstrap and
//! logging setup belong to the embedding host.

pub mod config;
pub mod connection;
pub mod handler;
pub mod listener;
pub mod notify;
pub mod policy;
pub mod relay;
pub mod session;

#[cfg(test)]
pub(crate) mod testutil;

pub use connection::ConnectionContext;
pub use handler::TunnelRequestHandler;
pub use notify::{notification_channel, NotificationReceiver, NotificationSender};
pub use policy::ForwardPolicy;
