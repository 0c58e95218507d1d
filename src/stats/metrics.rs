//! Statistics for streaming sessions

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Per-session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames delivered to the client
    pub frames_sent: u64,
    /// Bytes delivered, including clear-screen escapes
    pub bytes_sent: u64,
    /// Session duration
    pub duration: Duration,
}

impl SessionStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }
}

/// Server-wide counters
///
/// Shared by all sessions through an `Arc`; every field is updated with
/// relaxed atomics.
#[derive(Debug)]
pub struct ServerStats {
    started_at: Instant,
    sessions_started: AtomicU64,
    active_sessions: AtomicU64,
    frames_sent: AtomicU64,
    bytes_sent: AtomicU64,
    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
}

/// Point-in-time copy of [`ServerStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStatsSnapshot {
    /// Sessions ever started
    pub sessions_started: u64,
    /// Sessions currently streaming
    pub active_sessions: u64,
    /// Frames sent across all sessions
    pub frames_sent: u64,
    /// Bytes sent across all sessions
    pub bytes_sent: u64,
    /// Successful registry refreshes
    pub refreshes: u64,
    /// Failed registry refreshes
    pub refresh_failures: u64,
    /// Time since the server started
    pub uptime: Duration,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            sessions_started: AtomicU64::new(0),
            active_sessions: AtomicU64::new(0),
            frames_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            refresh_failures: AtomicU64::new(0),
        }
    }

    pub fn session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
        self.active_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn session_ended(&self) {
        // Saturate so a stray double-end can't wrap the gauge
        let _ = self
            .active_sessions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(1))
            });
    }

    pub fn frame_sent(&self, bytes: usize) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn refresh_succeeded(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn refresh_failed(&self) {
        self.refresh_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn active_sessions(&self) -> u64 {
        self.active_sessions.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ServerStatsSnapshot {
        ServerStatsSnapshot {
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            active_sessions: self.active_sessions.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}
