//! HTTP server
//!
//! Route dispatch, client classification and the JSON replies around the
//! streaming sessions.

pub mod classifier;
pub mod config;
pub mod listener;
pub mod response;
pub mod routes;

pub use classifier::{is_accepted_client, ClientClassifier};
pub use config::ServerConfig;
pub use listener::{FrameServer, ServerHandle};
pub use routes::AppState;
