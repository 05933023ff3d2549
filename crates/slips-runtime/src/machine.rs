//! The slip state machine.
//!
//! [`SlipMachine`] owns the ordered [`PanelCollection`], the per-panel
//! visibility states, and the last viewport sample, and turns every
//! external event into state plus [`Effect`] instructions:
//!
//! - root page changes → [`set_root`](SlipMachine::set_root)
//! - location/query changes → [`location_changed`](SlipMachine::location_changed)
//! - fetch batch completion → [`batch_loaded`](SlipMachine::batch_loaded)
//! - throttled viewport samples → [`scroll_sample`](SlipMachine::scroll_sample)
//! - navigation commands → [`navigate_to_slip`](SlipMachine::navigate_to_slip)
//! - highlight commands → [`highlight_slip`](SlipMachine::highlight_slip)
//!
//! All mutation happens synchronously inside these calls; the machine
//! performs no I/O and never blocks. Fetches are tagged with a generation
//! counter: when the identifier sequence changes again before a batch
//! resolves, the stale batch's generation no longer matches and its
//! results are dropped instead of clobbering the newer view.

use ahash::AHashMap;
use slips_core::panel::{Panel, PanelCollection};
use slips_core::query;
use slips_core::visibility::{self, ScrollSample, VisibilityState};
use slips_core::SlipConfig;

use crate::effect::Effect;

/// A pending fetch batch: which ids to load and under which generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchBatch {
    /// Generation this batch belongs to.
    pub generation: u64,
    /// Panel ids in request order.
    pub ids: Vec<String>,
}

impl From<FetchBatch> for Effect {
    fn from(batch: FetchBatch) -> Self {
        Effect::Fetch {
            generation: batch.generation,
            ids: batch.ids,
        }
    }
}

/// State machine for one slip stack.
pub struct SlipMachine<T> {
    config: SlipConfig,
    panels: PanelCollection<T>,
    states: AHashMap<String, VisibilityState>,
    sample: Option<ScrollSample>,
    search: String,
    requested_ids: Vec<String>,
    generation: u64,
}

impl<T: Clone + PartialEq> SlipMachine<T> {
    /// Create a machine with the given geometry. No panels are loaded.
    #[must_use]
    pub fn new(config: SlipConfig) -> Self {
        Self {
            config,
            panels: PanelCollection::new(),
            states: AHashMap::new(),
            sample: None,
            search: String::new(),
            requested_ids: Vec::new(),
            generation: 0,
        }
    }

    // -----------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------

    /// The ordered panel list, root first when present.
    #[must_use]
    pub fn panels(&self) -> &[Panel<T>] {
        self.panels.panels()
    }

    /// Per-id visibility states for the currently loaded panels.
    #[must_use]
    pub fn states(&self) -> &AHashMap<String, VisibilityState> {
        &self.states
    }

    /// Visibility state for one panel id.
    #[must_use]
    pub fn state_of(&self, id: &str) -> Option<VisibilityState> {
        self.states.get(id).copied()
    }

    /// Panel plus state at a caller's position within the stack.
    ///
    /// This is the per-index consumer view: a nested page knows only its
    /// own index and reads itself through it.
    #[must_use]
    pub fn panel_at(&self, index: usize) -> Option<(&Panel<T>, VisibilityState)> {
        let panel = self.panels.get(index)?;
        let state = self.state_of(&panel.id).unwrap_or_default();
        Some((panel, state))
    }

    /// Whether a viewport is currently attached (a sample has been seen).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.sample.is_some()
    }

    /// Identifier sequence of the most recent fetch request.
    #[must_use]
    pub fn requested_ids(&self) -> &[String] {
        &self.requested_ids
    }

    /// Current fetch generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Geometry configuration.
    #[must_use]
    pub fn config(&self) -> &SlipConfig {
        &self.config
    }

    // -----------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------

    /// Install or remove the root panel.
    ///
    /// Compared by value with the current root; an equal root is a no-op
    /// and returns no effects. On change the collection is reset around
    /// the new root, states are recomputed, and the viewport is told to
    /// scroll toward the end of the stack.
    pub fn set_root(&mut self, root: Option<Panel<T>>) -> Vec<Effect> {
        if !self.panels.reset_root(root) {
            return Vec::new();
        }
        tracing::debug!(
            target: "slips.machine",
            panels = self.panels.len(),
            has_root = self.panels.has_root(),
            "root panel replaced"
        );
        self.recompute();
        vec![self.scroll_to_end()]
    }

    /// React to a host location change.
    ///
    /// Parses the slip identifier sequence out of `search`. If the
    /// sequence is unchanged from the last request nothing happens;
    /// otherwise a new generation is started and a [`FetchBatch`] for the
    /// whole sequence is returned for the host (or a session) to execute.
    pub fn location_changed(&mut self, search: &str) -> Option<FetchBatch> {
        self.search = search.to_owned();
        let ids = query::parse_slip_ids(search);
        if ids == self.requested_ids {
            return None;
        }
        self.generation += 1;
        self.requested_ids = ids.clone();
        tracing::debug!(
            target: "slips.machine",
            generation = self.generation,
            ids = ?ids,
            "slip sequence changed, requesting batch"
        );
        Some(FetchBatch {
            generation: self.generation,
            ids,
        })
    }

    /// Apply a completed fetch batch.
    ///
    /// `panels` must already be decorated with their ids, transformed, and
    /// filtered of not-found results, in request order. A batch whose
    /// generation is not the machine's current one is stale — a newer
    /// navigation superseded it — and is dropped without touching state.
    pub fn batch_loaded(&mut self, generation: u64, panels: Vec<Panel<T>>) -> Vec<Effect> {
        if generation != self.generation {
            tracing::debug!(
                target: "slips.machine",
                stale = generation,
                current = self.generation,
                "dropping stale fetch batch"
            );
            return Vec::new();
        }
        self.panels.merge_append(panels);
        self.recompute();
        tracing::trace!(
            target: "slips.machine",
            panels = self.panels.len(),
            "fetch batch applied"
        );
        vec![self.scroll_to_end()]
    }

    /// Feed a throttled viewport sample and reclassify every panel.
    pub fn scroll_sample(&mut self, sample: ScrollSample) {
        self.sample = Some(sample);
        self.recompute();
    }

    /// The viewport was detached; geometry is unknown again.
    ///
    /// Classification falls back to the conservative no-container branch
    /// (every panel overlaid, none obstructed).
    pub fn container_detached(&mut self) {
        self.sample = None;
        self.recompute();
    }

    // -----------------------------------------------------------------
    // Command surface
    // -----------------------------------------------------------------

    /// Navigate to a slip by id.
    ///
    /// If the target is already loaded at index `k`, no fetch happens: the
    /// target becomes the active panel, all highlights clear, and the
    /// viewport is told to scroll to
    /// `page_width * k - (obstructed_page_width * k - 1)`.
    ///
    /// Otherwise the identifier sequence is rebuilt as the slips up to the
    /// caller's `origin_index` followed by the target, and a route request
    /// carrying that sequence is returned. The host performs the routing
    /// transition; loading starts when the new location arrives at
    /// [`location_changed`](Self::location_changed).
    pub fn navigate_to_slip(&mut self, to: &str, origin_index: usize) -> Option<Effect> {
        if let Some(k) = self.panels.index_of(to) {
            for (id, state) in &mut self.states {
                state.highlighted = false;
                state.active = id.as_str() == to;
            }
            let k = k as f32;
            let left = self.config.page_width * k - (self.config.obstructed_page_width * k - 1.0);
            tracing::debug!(target: "slips.machine", to, left, "scrolling to loaded slip");
            return Some(Effect::scroll_to(left));
        }

        let mut ids: Vec<String> = self
            .panels
            .panels()
            .iter()
            .skip(1)
            .take(origin_index)
            .map(|panel| panel.id.clone())
            .collect();
        ids.push(to.to_owned());
        let query = query::with_slip_ids(&self.search, &ids);
        tracing::debug!(target: "slips.machine", to, query = %query, "requesting route for new slip");
        Some(Effect::RequestRoute { query })
    }

    /// Set or toggle a panel's highlight.
    ///
    /// No-op when the id has no state entry; no entry is created. Other
    /// flags and other panels are untouched.
    pub fn highlight_slip(&mut self, id: &str, highlighted: Option<bool>) {
        if let Some(state) = self.states.get_mut(id) {
            state.highlighted = highlighted.unwrap_or(!state.highlighted);
        }
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn recompute(&mut self) {
        self.states = visibility::recompute(self.panels.panels(), self.sample, &self.config);
    }

    fn scroll_to_end(&self) -> Effect {
        Effect::scroll_to(self.config.page_width * (self.panels.len() + 1) as f32)
    }
}
