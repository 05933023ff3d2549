//! Scroll-derived visibility classification.
//!
//! Given the current scroll offset and viewport width, every panel in a
//! stack is classified with four flags:
//!
//! - `active` — the focused panel; always the last in the collection.
//! - `overlay` — scroll has passed the panel by more than one page width
//!   (minus the cumulative obstruction shrink) or has not yet reached the
//!   panel before it, so the panel renders stacked under/over a neighbour.
//! - `obstructed` — the panel's trailing edge is past the obstruction
//!   buffer or its leading edge has not entered the viewport's trailing
//!   buffer, so only its sliver is visible.
//! - `highlighted` — explicit UI accent; *always* cleared here. Highlight
//!   is only set through explicit highlight commands and does not survive
//!   a scroll-driven recompute.
//!
//! When no viewport is attached the geometry is unknown and the classifier
//! falls back to a conservative default: every panel `overlay = true`,
//! `obstructed = false`.
//!
//! # Invariants
//!
//! 1. Exactly one panel is `active` in a non-empty stack — the last one.
//! 2. `highlighted` is `false` on every freshly classified state.
//! 3. Output contains exactly one entry per panel currently in the stack.

use ahash::AHashMap;

use crate::panel::Panel;
use crate::{OBSTRUCTED_OFFSET, SlipConfig};

/// One throttled observation of the scrollable viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSample {
    /// Horizontal scroll offset in layout units.
    pub offset: f32,
    /// Current viewport width in layout units.
    pub viewport_width: f32,
}

impl ScrollSample {
    /// Create a sample from an offset and viewport width.
    #[must_use]
    pub const fn new(offset: f32, viewport_width: f32) -> Self {
        Self {
            offset,
            viewport_width,
        }
    }
}

/// Presentation flags for a single panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityState {
    /// Partially covered by the viewport edge or a stacked neighbour.
    pub obstructed: bool,
    /// Rendered above/behind neighbours due to scroll position.
    pub overlay: bool,
    /// Explicit accent, set only via highlight commands.
    pub highlighted: bool,
    /// The focused panel (last in the collection).
    pub active: bool,
}

/// Classify a single panel by position.
///
/// `index` is the panel's 0-based position, `count` the total panel count.
/// `sample` is `None` when no viewport is attached.
#[must_use]
pub fn classify(
    index: usize,
    count: usize,
    sample: Option<ScrollSample>,
    config: &SlipConfig,
) -> VisibilityState {
    let active = index + 1 == count;
    let Some(sample) = sample else {
        return VisibilityState {
            obstructed: false,
            overlay: true,
            highlighted: false,
            active,
        };
    };

    let i = index as f32;
    let pw = config.page_width;
    let opw = config.obstructed_page_width;

    let overlay = sample.offset > (pw * (i - 1.0) - (opw * i - 2.0)).max(0.0)
        || sample.offset < (pw * (i - 2.0)).max(0.0);
    let obstructed = sample.offset > (pw * (i + 1.0) - OBSTRUCTED_OFFSET - opw * (i - 1.0)).max(0.0)
        || sample.offset + sample.viewport_width < pw * i + OBSTRUCTED_OFFSET;

    VisibilityState {
        obstructed,
        overlay,
        highlighted: false,
        active,
    }
}

/// Recompute the visibility state of every panel in `panels`.
///
/// The result replaces the previous state map wholesale: entries for
/// removed panels disappear, and any previously set highlight is cleared.
#[must_use]
pub fn recompute<T>(
    panels: &[Panel<T>],
    sample: Option<ScrollSample>,
    config: &SlipConfig,
) -> AHashMap<String, VisibilityState> {
    let count = panels.len();
    panels
        .iter()
        .enumerate()
        .map(|(index, panel)| (panel.id.clone(), classify(index, count, sample, config)))
        .collect()
}
