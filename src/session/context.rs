//! Session context
//!
//! Identifies a streaming session in logs.

/// Information about the request a session is serving
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Unique session ID
    pub session_id: u64,

    /// Name of the sequence being played
    pub sequence: String,

    /// Client `User-Agent` header, empty if absent
    pub user_agent: String,
}

impl SessionContext {
    /// Create a new context
    pub fn new(session_id: u64, sequence: impl Into<String>) -> Self {
        Self {
            session_id,
            sequence: sequence.into(),
            user_agent: String::new(),
        }
    }

    /// Attach the client's user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
