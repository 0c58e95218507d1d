//! Client classification
//!
//! Streams are only served to command-line HTTP tools. Browsers get a JSON
//! nudge instead.

/// User-agent substring identifying curl
pub const CURL_SIGNATURE: &str = "curl";

/// Whether `user_agent` belongs to curl
pub fn is_accepted_client(user_agent: &str) -> bool {
    user_agent.contains(CURL_SIGNATURE)
}

/// Case-sensitive user-agent substring match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientClassifier {
    signature: String,
}

impl ClientClassifier {
    /// Accept clients whose user agent contains `signature`
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }

    /// Substring a user agent must contain
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Whether `user_agent` contains the signature
    pub fn is_accepted(&self, user_agent: &str) -> bool {
        user_agent.contains(self.signature.as_str())
    }
}

impl Default for ClientClassifier {
    fn default() -> Self {
        Self::new(CURL_SIGNATURE)
    }
}
