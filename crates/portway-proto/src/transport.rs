//! Abstract seam toward the authenticated secure-transport layer.
//!
//! The transport owns the handshake, encryption, and channel framing; the
//! tunnel core only needs the ability to open a `forwarded-tcpip` channel on
//! an existing connection and relay bytes over it.

use crate::error::ProtoResult;
use crate::messages::ForwardedTcpip;
use std::future::Future;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

/// A logical channel's bidirectional byte stream.
pub trait ChannelStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> ChannelStream for T {}

/// A channel-level control request surfaced by the transport.
///
/// Forwarded channels carry data only; the relay discards these unanswered.
#[derive(Debug)]
pub struct ChannelRequest {
    pub kind: String,
    pub payload: Vec<u8>,
}

/// A freshly opened logical channel: its byte stream plus the stream of
/// control requests the peer may send on it.
pub struct OpenedChannel {
    pub stream: Box<dyn ChannelStream>,
    pub requests: mpsc::UnboundedReceiver<ChannelRequest>,
}

/// Opens new logical channels on the parent connection.
///
/// Implemented by the secure-transport layer. Opening may block until the
/// transport completes its own framing handshake for the channel.
pub trait ChannelOpener: Send + Sync {
    /// Open a [`FORWARDED_TCPIP`](crate::messages::FORWARDED_TCPIP) channel
    /// announcing one accepted socket.
    fn open_forwarded<'a>(
        &'a self,
        payload: &'a ForwardedTcpip,
    ) -> Pin<Box<dyn Future<Output = ProtoResult<OpenedChannel>> + Send + 'a>>;
}
