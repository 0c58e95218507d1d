//! Frame registry
//!
//! The registry maps animation names to [`Sequence`]s and can reload its
//! contents from an external [`FrameSource`].
//!
//! # Architecture
//!
//! ```text
//!                 Arc<FrameRegistry>
//!          ┌───────────────────────────────┐
//!          │ catalog: ArcSwap<Catalog {    │
//!          │   "parrot" -> Arc<Sequence>,  │◄── refresh(): load + store
//!          │   ...                         │
//!          │ }>                            │
//!          └───────────────┬───────────────┘
//!                          │ lookup()
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//!      [Session]       [Session]       [Session]
//!   Arc<Sequence>   Arc<Sequence>   Arc<Sequence>
//! ```
//!
//! # Snapshot Design
//!
//! A refresh never edits the live catalog. It builds a new one and swaps the
//! pointer, so readers are lock-free and sessions keep playing the sequence
//! they looked up even after the registry has moved on.

pub mod builtin;
pub mod error;
pub mod frame;
pub mod source;
pub mod store;

pub use error::RegistryError;
pub use frame::{Catalog, Sequence, SequenceSpec};
pub use source::{BuiltinSource, FileSource, FrameSource, HttpSource};
pub use store::{FrameRegistry, RefreshOutcome};
