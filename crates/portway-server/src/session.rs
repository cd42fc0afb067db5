//! Session display loop.
//!
//! Forwards tunnel notifications to the requester's interactive session as
//! `server: <message>` lines. Returning means the notification stream has
//! closed: the tunnel is no longer accepting connections and the session
//! may end.

use crate::notify::NotificationReceiver;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Consume `rx` until it closes, writing each status line to `out`.
pub async fn run_message_loop<W>(mut rx: NotificationReceiver, mut out: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = rx.recv().await {
        out.write_all(format!("server: {msg}\n").as_bytes()).await?;
    }
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::notification_channel;
    use std::io::Cursor;

    #[tokio::test]
    async fn writes_prefixed_lines_until_close() {
        let (mut tx, rx) = notification_channel();
        tx.send("forwarding traffic from 127.0.0.1:9000");
        tx.send("accepted connection from 10.0.0.5:51234");
        tx.close();

        let mut out = Cursor::new(Vec::new());
        run_message_loop(rx, &mut out).await.unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(
            text,
            "server: forwarding traffic from 127.0.0.1:9000\n\
             server: accepted connection from 10.0.0.5:51234\n"
        );
    }

    #[tokio::test]
    async fn returns_when_sender_dropped() {
        let (tx, rx) = notification_channel();
        drop(tx);
        let mut out = Cursor::new(Vec::new());
        run_message_loop(rx, &mut out).await.unwrap();
        assert!(out.into_inner().is_empty());
    }
}
