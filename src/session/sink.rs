//! Frame sinks
//!
//! A [`FrameSink`] is the writable side of a streaming response. Writes are
//! buffered; `flush` hands the buffer to the client.

use std::io;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

/// Writable response channel with explicit flush
#[async_trait]
pub trait FrameSink: Send {
    /// Append data to the pending output
    fn write(&mut self, data: &[u8]);

    /// Deliver pending output to the client
    ///
    /// An error means the client is gone.
    async fn flush(&mut self) -> io::Result<()>;
}

/// Body stream handed to the HTTP layer
pub type BodyStream = ReceiverStream<io::Result<Bytes>>;

/// Sink feeding an HTTP response body through a bounded channel
///
/// Each flush becomes one body chunk. The channel holds a single chunk, so a
/// client that stops reading suspends the next flush.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<io::Result<Bytes>>,
    pending: BytesMut,
}

/// Create a sink and the body stream it feeds
///
/// `cancel` is triggered when the body stream is dropped, which is how hyper
/// reports that the client went away. The watcher ends with the token.
pub fn body_channel(cancel: CancellationToken) -> (ChannelSink, BodyStream) {
    let (tx, rx) = mpsc::channel(1);

    let watcher = tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = watcher.closed() => {
                tracing::debug!("Client stopped listening");
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    });

    let sink = ChannelSink {
        tx,
        pending: BytesMut::new(),
    };

    (sink, ReceiverStream::new(rx))
}

#[async_trait]
impl FrameSink for ChannelSink {
    fn write(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    async fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let chunk = self.pending.split().freeze();
        self.tx
            .send(Ok(chunk))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "client disconnected"))
    }
}
