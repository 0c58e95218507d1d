//! # ascii-live
//!
//! Streams animated ASCII art to terminals over plain HTTP.
//!
//! A client runs `curl http://host/<name>` and receives an endless chunked
//! response: every tick the server sends a clear-screen escape followed by the
//! next frame of the named animation, looping until the client hangs up.
//!
//! # Architecture
//!
//! ```text
//!            Arc<FrameRegistry>
//!     ┌──────────────────────────────┐
//!     │ ArcSwap<Catalog>             │◄──── refresh() ◄── FrameSource
//!     │   name -> Arc<Sequence>      │                    (builtin, file, http)
//!     └──────────────┬───────────────┘
//!                    │ lookup()
//!                    ▼
//!   GET /{name} ──► dispatcher ──► classifier ──► StreamingSession ──► chunked body
//!                                                   │
//!                                     CancellationToken (peer gone / shutdown)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ascii_live::registry::{BuiltinSource, FrameRegistry};
//! use ascii_live::{FrameServer, ServerConfig};
//!
//! # async fn run() -> ascii_live::Result<()> {
//! let registry = Arc::new(FrameRegistry::new(Arc::new(BuiltinSource)));
//! let config = ServerConfig::default().port(8080);
//! FrameServer::new(config, registry).run().await
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use error::{Error, Result};
pub use registry::{FrameRegistry, Sequence};
pub use server::{FrameServer, ServerConfig, ServerHandle};
pub use session::StreamingSession;
