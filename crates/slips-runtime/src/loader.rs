//! The fetch-by-id capability boundary.
//!
//! Hosts provide panel data through [`PanelLoader`], an injected
//! capability rather than an ambient global. Two distinct "failure"
//! shapes cross this boundary:
//!
//! - `Ok(None)` — the id resolved to nothing (404-equivalent). Recovered
//!   silently: the panel is dropped from the batch.
//! - `Err(LoadError)` — transport-level failure. Not recovered: the error
//!   propagates to the caller and no partial batch is applied.

use std::fmt;

/// Asynchronous-in-spirit fetch-by-id capability.
///
/// The runtime calls this once per id in a batch and applies the joined
/// results atomically. Implementations may block (the session driver calls
/// from its own reaction) or be wrapped by a host executor that resolves
/// `Effect::Fetch` batches elsewhere and feeds results back by message.
pub trait PanelLoader {
    /// Raw payload produced by the host before the per-panel transform.
    type Raw;

    /// Load one panel. `Ok(None)` means not found.
    fn load_panel(&self, id: &str) -> Result<Option<Self::Raw>, LoadError>;
}

/// Transport-level failure while loading a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    id: String,
    reason: String,
}

impl LoadError {
    /// Create an error for the given panel id.
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Id of the panel that failed to load.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load panel `{}`: {}", self.id, self.reason)
    }
}

impl std::error::Error for LoadError {}
