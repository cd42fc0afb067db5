//! Typed payloads for remote port forwarding.
//!
//! These are the bodies of the secure-transport layer's global requests and
//! channel opens; the transport frames and routes them, this crate only
//! defines their encoding.

use crate::error::ProtoResult;
use crate::wire::{Reader, Writer};

/// Global request type asking the server to listen on a port.
pub const TCPIP_FORWARD: &str = "tcpip-forward";

/// Channel type opened toward the peer for each accepted socket.
pub const FORWARDED_TCPIP: &str = "forwarded-tcpip";

/// Body of a `tcpip-forward` global request.
///
/// `bind_port == 0` asks for an OS-assigned ephemeral port. An empty
/// `bind_addr` means "all interfaces".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    pub bind_addr: String,
    pub bind_port: u32,
}

impl BindRequest {
    pub fn decode(payload: &[u8]) -> ProtoResult<Self> {
        let mut r = Reader::new(payload);
        let bind_addr = r.take_string()?;
        let bind_port = r.take_u32()?;
        r.finish()?;
        Ok(Self {
            bind_addr,
            bind_port,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_string(&self.bind_addr);
        w.put_u32(self.bind_port);
        w.into_bytes()
    }
}

/// Success body of a `tcpip-forward` reply: the port actually bound.
///
/// Differs from the requested port when the request asked for port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindResponse {
    pub bound_port: u32,
}

impl BindResponse {
    pub fn decode(payload: &[u8]) -> ProtoResult<Self> {
        let mut r = Reader::new(payload);
        let bound_port = r.take_u32()?;
        r.finish()?;
        Ok(Self { bound_port })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u32(self.bound_port);
        w.into_bytes()
    }
}

/// Body of a `forwarded-tcpip` channel open: addressing metadata for one
/// accepted socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedTcpip {
    /// Address the tunnel was bound on (from the original request).
    pub dest_addr: String,
    /// Effective bound port of the tunnel.
    pub dest_port: u32,
    /// Address of the connecting peer.
    pub origin_addr: String,
    /// Source port of the connecting peer.
    pub origin_port: u32,
}

impl ForwardedTcpip {
    pub fn decode(payload: &[u8]) -> ProtoResult<Self> {
        let mut r = Reader::new(payload);
        let dest_addr = r.take_string()?;
        let dest_port = r.take_u32()?;
        let origin_addr = r.take_string()?;
        let origin_port = r.take_u32()?;
        r.finish()?;
        Ok(Self {
            dest_addr,
            dest_port,
            origin_addr,
            origin_port,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_string(&self.dest_addr);
        w.put_u32(self.dest_port);
        w.put_string(&self.origin_addr);
        w.put_u32(self.origin_port);
        w.into_bytes()
    }
}

/// Synchronous reply to a global request.
///
/// `payload` carries the encoded [`BindResponse`] on success, or diagnostic
/// bytes on failure (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestReply {
    pub ok: bool,
    pub payload: Vec<u8>,
}

impl RequestReply {
    pub fn accept(payload: Vec<u8>) -> Self {
        Self { ok: true, payload }
    }

    pub fn deny(payload: Vec<u8>) -> Self {
        Self { ok: false, payload }
    }
}
