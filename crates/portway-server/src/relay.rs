//! Bidirectional byte relay between one accepted socket and one logical
//! channel.
//!
//! The two copy directions form the unit of cleanup: the first to reach
//! EOF or an I/O error tears both endpoints down, so the other direction
//! unblocks and the pair exits together. EOF here is normal termination of
//! one forwarded connection, never reported as an error.

use portway_proto::transport::OpenedChannel;
use std::io;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

/// Relays one accepted socket over one freshly opened logical channel.
pub struct ChannelRelay {
    stream: TcpStream,
    channel: OpenedChannel,
}

impl ChannelRelay {
    pub fn new(stream: TcpStream, channel: OpenedChannel) -> Self {
        Self { stream, channel }
    }

    /// Relay until either side closes. No retries: a failed relay ends this
    /// forwarded connection and the peer may simply reconnect.
    pub async fn run(self) {
        let ChannelRelay { stream, channel } = self;
        let OpenedChannel {
            stream: chan,
            mut requests,
        } = channel;

        // Forwarded channels carry data only; drain control requests so the
        // transport never blocks delivering one.
        tokio::spawn(async move {
            while let Some(req) = requests.recv().await {
                debug!(kind = %req.kind, "discarding control request on forwarded channel");
            }
        });

        let (mut sock_r, mut sock_w) = stream.into_split();
        let (mut chan_r, mut chan_w) = tokio::io::split(chan);

        let to_channel = async {
            let res = tokio::io::copy(&mut sock_r, &mut chan_w).await;
            let _ = chan_w.shutdown().await;
            res
        };
        let to_socket = async {
            let res = tokio::io::copy(&mut chan_r, &mut sock_w).await;
            let _ = sock_w.shutdown().await;
            res
        };

        // Whichever direction finishes first wins the select; dropping the
        // other future releases both halves, closing socket and channel
        // together.
        tokio::select! {
            res = to_channel => log_direction("socket->channel", res),
            res = to_socket => log_direction("channel->socket", res),
        }
    }
}

fn log_direction(direction: &str, res: io::Result<u64>) {
    match res {
        Ok(bytes) => debug!(direction, bytes, "relay direction finished"),
        Err(e) => debug!(direction, error = %e, "relay direction closed"),
    }
}
