//! Frame sequence types
//!
//! A [`Sequence`] is one animation: its frames in playback order plus the
//! delay between them. A [`Catalog`] is an immutable snapshot of every
//! sequence the registry knows about.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// An ordered set of ASCII-art frames with a playback delay
///
/// Immutable once built. Sessions hold an `Arc<Sequence>`, so a registry
/// refresh never changes a sequence that is being played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    frames: Vec<String>,
    delay: Duration,
}

impl Sequence {
    /// Create a sequence from owned frames
    pub fn new(frames: Vec<String>, delay: Duration) -> Self {
        Self { frames, delay }
    }

    /// Create a sequence from string literals
    pub fn from_static(frames: &[&str], delay: Duration) -> Self {
        Self::new(frames.iter().map(|f| (*f).to_owned()).collect(), delay)
    }

    /// Frame text at `index`, if in range
    pub fn frame_at(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(String::as_str)
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence has no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Delay between two frames
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// All frames in playback order
    pub fn frames(&self) -> &[String] {
        &self.frames
    }
}

/// On-the-wire description of one sequence
///
/// ```json
/// { "delay_ms": 70, "frames": ["frame one", "frame two"] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceSpec {
    /// Delay between frames in milliseconds
    pub delay_ms: u64,
    /// Frame texts in playback order
    pub frames: Vec<String>,
}

impl From<SequenceSpec> for Sequence {
    fn from(spec: SequenceSpec) -> Self {
        Sequence::new(spec.frames, Duration::from_millis(spec.delay_ms))
    }
}

/// Immutable snapshot of named sequences
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sequences: HashMap<String, Arc<Sequence>>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON form: an object of name to [`SequenceSpec`]
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        let specs: HashMap<String, SequenceSpec> = serde_json::from_slice(data)?;

        Ok(specs
            .into_iter()
            .map(|(name, spec)| (name, Sequence::from(spec)))
            .collect())
    }

    /// Add or replace a sequence
    pub fn insert(&mut self, name: impl Into<String>, sequence: Sequence) {
        self.sequences.insert(name.into(), Arc::new(sequence));
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, sequence: Sequence) -> Self {
        self.insert(name, sequence);
        self
    }

    /// Look up a sequence by name
    pub fn get(&self, name: &str) -> Option<Arc<Sequence>> {
        self.sequences.get(name).cloned()
    }

    /// Sequence names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sequences.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of sequences
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl FromIterator<(String, Sequence)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Sequence)>>(iter: I) -> Self {
        Self {
            sequences: iter
                .into_iter()
                .map(|(name, seq)| (name, Arc::new(seq)))
                .collect(),
        }
    }
}
