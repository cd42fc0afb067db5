//! In-memory test doubles for the transport seam.

use portway_proto::error::{ProtoError, ProtoResult};
use portway_proto::messages::ForwardedTcpip;
use portway_proto::transport::{ChannelOpener, ChannelRequest, OpenedChannel};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::DuplexStream;
use tokio::sync::mpsc;

/// One recorded channel open: the payload the server announced plus the far
/// end of the in-memory channel for the test to drive.
pub(crate) struct OpenedForward {
    pub payload: ForwardedTcpip,
    pub peer: DuplexStream,
    #[allow(dead_code)]
    pub requests: mpsc::UnboundedSender<ChannelRequest>,
}

/// `ChannelOpener` built on `tokio::io::duplex`, recording every open.
pub(crate) struct MockOpener {
    opens: mpsc::UnboundedSender<OpenedForward>,
    fail_next: AtomicUsize,
}

impl MockOpener {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<OpenedForward>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                opens: tx,
                fail_next: AtomicUsize::new(0),
            }),
            rx,
        )
    }

    /// Make the next `n` opens fail.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }
}

impl ChannelOpener for MockOpener {
    fn open_forwarded<'a>(
        &'a self,
        payload: &'a ForwardedTcpip,
    ) -> Pin<Box<dyn Future<Output = ProtoResult<OpenedChannel>> + Send + 'a>> {
        Box::pin(async move {
            let should_fail = self
                .fail_next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if should_fail {
                return Err(ProtoError::OpenFailed(
                    "administratively prohibited".to_string(),
                ));
            }

            let (near, far) = tokio::io::duplex(64 * 1024);
            let (req_tx, req_rx) = mpsc::unbounded_channel();
            let _ = self.opens.send(OpenedForward {
                payload: payload.clone(),
                peer: far,
                requests: req_tx,
            });
            Ok(OpenedChannel {
                stream: Box::new(near),
                requests: req_rx,
            })
        })
    }
}
