//! portway-proto: shared protocol library for portway reverse tunnels.
//!
//! Provides the wire marshaling used by the secure-transport layer's
//! request and channel-open payloads, the typed forward messages, and the
//! abstract seam through which the server opens logical channels on an
//! authenticated connection.

pub mod error;
pub mod messages;
pub mod transport;
pub mod wire;

// Re-export commonly used items at crate root.
pub use error::{ProtoError, ProtoResult};
pub use messages::{
    BindRequest, BindResponse, ForwardedTcpip, RequestReply, FORWARDED_TCPIP, TCPIP_FORWARD,
};
pub use transport::{ChannelOpener, ChannelRequest, ChannelStream, OpenedChannel};
