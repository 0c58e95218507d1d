//! Session state machine
//!
//! Tracks one streaming session from the first wait to disconnection: the
//! frame cursor, the lifecycle phase and what has been sent.

use std::time::Instant;

use crate::stats::SessionStats;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting out the delay before the next frame
    Waiting,
    /// Writing and flushing a frame
    Emitting,
    /// Cancelled; nothing more will be written
    Closed,
}

/// Complete session state
#[derive(Debug)]
pub struct SessionState {
    /// Current phase
    pub phase: SessionPhase,

    /// Index of the next frame to emit
    cursor: usize,

    /// Session start time
    pub started_at: Instant,

    /// Frames flushed to the client
    pub frames_sent: u64,

    /// Bytes flushed to the client
    pub bytes_sent: u64,
}

impl SessionState {
    /// Create a new session state with the cursor at frame 0
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Waiting,
            cursor: 0,
            started_at: Instant::now(),
            frames_sent: 0,
            bytes_sent: 0,
        }
    }

    /// Index of the frame to emit next, wrapping to 0 past the end
    pub fn current_index(&mut self, len: usize) -> usize {
        if self.cursor >= len {
            self.cursor = 0;
        }
        self.cursor
    }

    /// Move the cursor past the frame just emitted
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Start emitting a frame
    pub fn begin_emit(&mut self) {
        if self.phase == SessionPhase::Waiting {
            self.phase = SessionPhase::Emitting;
        }
    }

    /// Record a flushed frame and go back to waiting
    pub fn frame_flushed(&mut self, bytes: usize) {
        self.frames_sent += 1;
        self.bytes_sent += bytes as u64;
        if self.phase == SessionPhase::Emitting {
            self.phase = SessionPhase::Waiting;
        }
    }

    /// Close the session
    pub fn close(&mut self) {
        self.phase = SessionPhase::Closed;
    }

    /// Snapshot of what this session has sent
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            frames_sent: self.frames_sent,
            bytes_sent: self.bytes_sent,
            duration: self.started_at.elapsed(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
