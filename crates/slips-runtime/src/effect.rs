//! Outward side-effect instructions.
//!
//! The slip machine never touches the viewport, the router, or the
//! network. Every state transition instead returns [`Effect`] values that
//! the host executes: scroll the container, request a route change, or
//! fetch a batch of panels. This keeps the machine synchronous and fully
//! testable — effects are plain data that can be asserted on.

/// A side effect requested from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Scroll the viewport container to an absolute position.
    ScrollTo {
        /// Horizontal target in layout units.
        left: f32,
        /// Vertical target in layout units (always 0 today).
        top: f32,
        /// Animate with smooth easing rather than jumping.
        smooth: bool,
    },
    /// Ask the host routing layer to apply a new query string.
    ///
    /// The host keeps its current path and performs the actual transition;
    /// once the location settles it feeds the new search string back via
    /// `SlipMachine::location_changed`.
    RequestRoute {
        /// Encoded query string, no leading `?`.
        query: String,
    },
    /// Fetch the given panel ids as one batch.
    ///
    /// Results must be applied jointly through
    /// `SlipMachine::batch_loaded` with the same `generation`; a batch
    /// whose generation is no longer current is dropped there.
    Fetch {
        /// Generation the batch belongs to.
        generation: u64,
        /// Panel ids in request order.
        ids: Vec<String>,
    },
}

impl Effect {
    /// Smooth horizontal scroll instruction.
    #[must_use]
    pub fn scroll_to(left: f32) -> Self {
        Self::ScrollTo {
            left,
            top: 0.0,
            smooth: true,
        }
    }
}
