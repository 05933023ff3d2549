#![forbid(unsafe_code)]

//! Core data model for horizontally scrolled slip stacks.
//!
//! A *slip* is a lazily loaded side page layered next to a primary (root)
//! page in a horizontally scrollable viewport. This crate holds the pure
//! parts of that model:
//!
//! - [`panel`] — the ordered, id-unique [`PanelCollection`] with its
//!   replace-root and append-merge operations.
//! - [`visibility`] — the classifier mapping (panel index, scroll offset,
//!   viewport width) to per-panel presentation flags.
//! - [`query`] — the repeated-query-parameter codec used to encode which
//!   slips a location wants loaded.
//!
//! No I/O, no clocks, no async: everything here is a plain function over
//! plain data so it can be exercised without a host harness. The stateful
//! orchestration lives in `slips-runtime`.

use core::time::Duration;

pub mod panel;
pub mod query;
pub mod visibility;

pub use panel::{Panel, PanelCollection};
pub use visibility::{ScrollSample, VisibilityState};

/// Horizontal distance (in layout units) a panel's edge may sit past the
/// viewport edge before the panel counts as obstructed.
pub const OBSTRUCTED_OFFSET: f32 = 120.0;

/// Minimum spacing between scroll samples delivered to the classifier.
pub const THROTTLE_TIME: Duration = Duration::from_millis(16);

/// Geometry configuration for a slip stack.
///
/// `page_width` is the nominal width of one panel; `obstructed_page_width`
/// is the sliver of a panel that stays visible when later panels stack on
/// top of it, so scroll targets shrink by that much per preceding panel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlipConfig {
    /// Nominal panel width in layout units.
    pub page_width: f32,
    /// Per-panel cumulative obstruction shrink in layout units.
    pub obstructed_page_width: f32,
}

impl SlipConfig {
    /// Create a config with explicit widths.
    #[must_use]
    pub const fn new(page_width: f32, obstructed_page_width: f32) -> Self {
        Self {
            page_width,
            obstructed_page_width,
        }
    }
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self {
            page_width: 625.0,
            obstructed_page_width: 40.0,
        }
    }
}
