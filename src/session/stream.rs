//! Streaming session
//!
//! Plays one [`Sequence`] to one client: wait, clear the screen, write the
//! frame, flush, move on, and wrap around at the end. The loop runs until the
//! session's cancellation token fires or the client goes away.

use std::sync::Arc;

use bytes::BytesMut;
use tokio_util::sync::CancellationToken;

use super::context::SessionContext;
use super::sink::FrameSink;
use super::state::SessionState;
use crate::registry::Sequence;
use crate::stats::{ServerStats, SessionStats};

/// ANSI erase-display followed by cursor-home
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Error starting a session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The sequence has no frames to loop over
    #[error("sequence {0} has no frames")]
    EmptySequence(String),
}

/// One client's animation stream
pub struct StreamingSession<S: FrameSink> {
    context: SessionContext,
    sequence: Arc<Sequence>,
    sink: S,
    cancel: CancellationToken,
    state: SessionState,
    server_stats: Option<Arc<ServerStats>>,
}

impl<S: FrameSink> StreamingSession<S> {
    /// Create a session
    ///
    /// Fails if the sequence is empty, since there is nothing to loop over.
    pub fn new(
        context: SessionContext,
        sequence: Arc<Sequence>,
        sink: S,
        cancel: CancellationToken,
    ) -> Result<Self, SessionError> {
        if sequence.is_empty() {
            return Err(SessionError::EmptySequence(context.sequence));
        }

        Ok(Self {
            context,
            sequence,
            sink,
            cancel,
            state: SessionState::new(),
            server_stats: None,
        })
    }

    /// Report frames and lifecycle into server-wide counters
    pub fn with_server_stats(mut self, stats: Arc<ServerStats>) -> Self {
        self.server_stats = Some(stats);
        self
    }

    /// Session context
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Run until cancelled
    ///
    /// Never fails: a write error means the client disconnected, which
    /// cancels the session like any other disconnect.
    pub async fn run(mut self) -> SessionStats {
        if let Some(stats) = &self.server_stats {
            stats.session_started();
        }

        tracing::debug!(
            session_id = self.context.session_id,
            sequence = %self.context.sequence,
            user_agent = %self.context.user_agent,
            frames = self.sequence.len(),
            delay_ms = self.sequence.delay().as_millis() as u64,
            "Streaming session started"
        );

        let mut buf = BytesMut::new();

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let index = self.state.current_index(self.sequence.len());

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.sequence.delay()) => {}
            }

            self.state.begin_emit();

            let frame = self.sequence.frame_at(index).unwrap_or_default();
            buf.clear();
            buf.extend_from_slice(CLEAR_SCREEN.as_bytes());
            buf.extend_from_slice(frame.as_bytes());
            buf.extend_from_slice(b"\n");
            self.sink.write(&buf);

            let flushed = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                result = self.sink.flush() => result,
            };

            if let Err(e) = flushed {
                tracing::debug!(
                    session_id = self.context.session_id,
                    error = %e,
                    "Write failed, treating as disconnect"
                );
                self.cancel.cancel();
                break;
            }

            self.state.frame_flushed(buf.len());
            if let Some(stats) = &self.server_stats {
                stats.frame_sent(buf.len());
            }

            self.state.advance();
        }

        self.state.close();
        let stats = self.state.stats();

        if let Some(server_stats) = &self.server_stats {
            server_stats.session_ended();
        }

        tracing::info!(
            session_id = self.context.session_id,
            sequence = %self.context.sequence,
            user_agent = %self.context.user_agent,
            frames_sent = stats.frames_sent,
            bytes_sent = stats.bytes_sent,
            duration_ms = stats.duration.as_millis() as u64,
            "Streaming session closed"
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;

    /// Records flushed chunks; cancels after a set number of them
    struct RecordingSink {
        flushed: Arc<Mutex<Vec<String>>>,
        pending: Vec<u8>,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl RecordingSink {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let flushed = Arc::new(Mutex::new(Vec::new()));
            let sink = Self {
                flushed: Arc::clone(&flushed),
                pending: Vec::new(),
                cancel_after: None,
            };
            (sink, flushed)
        }

        fn cancel_after(mut self, frames: usize, token: CancellationToken) -> Self {
            self.cancel_after = Some((frames, token));
            self
        }
    }

    #[async_trait]
    impl FrameSink for RecordingSink {
        fn write(&mut self, data: &[u8]) {
            self.pending.extend_from_slice(data);
        }

        async fn flush(&mut self) -> io::Result<()> {
            let chunk = String::from_utf8(std::mem::take(&mut self.pending)).unwrap();
            let count = {
                let mut flushed = self.flushed.lock().unwrap();
                flushed.push(chunk);
                flushed.len()
            };
            if let Some((limit, token)) = &self.cancel_after {
                if count >= *limit {
                    token.cancel();
                }
            }
            Ok(())
        }
    }

    /// Fails every flush, like a socket whose peer has gone
    struct BrokenSink;

    #[async_trait]
    impl FrameSink for BrokenSink {
        fn write(&mut self, _data: &[u8]) {}

        async fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"))
        }
    }

    fn abc(delay: Duration) -> Arc<Sequence> {
        Arc::new(Sequence::from_static(&["A", "B", "C"], delay))
    }

    fn context() -> SessionContext {
        SessionContext::new(1, "abc").with_user_agent("curl/8.0")
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_wrap_around() {
        let cancel = CancellationToken::new();
        let (sink, flushed) = RecordingSink::new();
        let sink = sink.cancel_after(7, cancel.clone());

        let session =
            StreamingSession::new(context(), abc(Duration::from_millis(100)), sink, cancel)
                .unwrap();
        let stats = session.run().await;

        let flushed = flushed.lock().unwrap();
        let frames: Vec<&str> = flushed
            .iter()
            .map(|chunk| {
                let body = chunk.strip_prefix(CLEAR_SCREEN).unwrap();
                body.strip_suffix('\n').unwrap()
            })
            .collect();

        assert_eq!(frames, vec!["A", "B", "C", "A", "B", "C", "A"]);
        assert_eq!(stats.frames_sent, 7);
        assert_eq!(stats.bytes_sent, 7 * (CLEAR_SCREEN.len() as u64 + 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_frame_waits_for_delay() {
        let cancel = CancellationToken::new();
        let (sink, flushed) = RecordingSink::new();

        let session = StreamingSession::new(
            context(),
            abc(Duration::from_millis(100)),
            sink,
            cancel.clone(),
        )
        .unwrap();
        let handle = tokio::spawn(session.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(flushed.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(flushed.lock().unwrap().len(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(flushed.lock().unwrap().len(), 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_delay() {
        let cancel = CancellationToken::new();
        let (sink, flushed) = RecordingSink::new();

        let session = StreamingSession::new(
            context(),
            abc(Duration::from_secs(3600)),
            sink,
            cancel.clone(),
        )
        .unwrap();
        let handle = tokio::spawn(session.run());

        tokio::time::sleep(Duration::from_millis(10)).await;
        let cancelled_at = Instant::now();
        cancel.cancel();

        let stats = handle.await.unwrap();
        assert!(cancelled_at.elapsed() < Duration::from_secs(1));
        assert_eq!(stats.frames_sent, 0);
        assert!(flushed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_already_cancelled_writes_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (sink, flushed) = RecordingSink::new();

        let session = StreamingSession::new(context(), abc(Duration::ZERO), sink, cancel).unwrap();
        let stats = session.run().await;

        assert_eq!(stats.frames_sent, 0);
        assert!(flushed.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_ends_session_silently() {
        let cancel = CancellationToken::new();

        let session = StreamingSession::new(
            context(),
            abc(Duration::from_millis(10)),
            BrokenSink,
            cancel.clone(),
        )
        .unwrap();
        let stats = session.run().await;

        assert_eq!(stats.frames_sent, 0);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let (sink, _) = RecordingSink::new();
        let empty = Arc::new(Sequence::new(Vec::new(), Duration::from_millis(10)));

        let result = StreamingSession::new(context(), empty, sink, CancellationToken::new());
        assert!(matches!(result, Err(SessionError::EmptySequence(name)) if name == "abc"));
    }

    #[tokio::test]
    async fn test_zero_delay_sequence() {
        let cancel = CancellationToken::new();
        let (sink, flushed) = RecordingSink::new();
        let sink = sink.cancel_after(5, cancel.clone());

        let seq = Arc::new(Sequence::from_static(&["only"], Duration::ZERO));
        let session = StreamingSession::new(context(), seq, sink, cancel).unwrap();
        session.run().await;

        let flushed = flushed.lock().unwrap();
        assert_eq!(flushed.len(), 5);
        assert!(flushed.iter().all(|c| c == "\x1b[2J\x1b[Honly\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_stats_updated() {
        let cancel = CancellationToken::new();
        let stats = Arc::new(ServerStats::new());
        let (sink, _) = RecordingSink::new();
        let sink = sink.cancel_after(4, cancel.clone());

        let session =
            StreamingSession::new(context(), abc(Duration::from_millis(5)), sink, cancel)
                .unwrap()
                .with_server_stats(Arc::clone(&stats));
        session.run().await;

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.sessions_started, 1);
        assert_eq!(snapshot.active_sessions, 0);
        assert_eq!(snapshot.frames_sent, 4);
    }
}
