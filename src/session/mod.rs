//! Streaming sessions
//!
//! A session owns one client's response body and loops a frame sequence into
//! it until the connection ends.

pub mod context;
pub mod sink;
pub mod state;
pub mod stream;

pub use context::SessionContext;
pub use sink::{body_channel, BodyStream, ChannelSink, FrameSink};
pub use state::{SessionPhase, SessionState};
pub use stream::{SessionError, StreamingSession, CLEAR_SCREEN};
