//! Session driver: machine + loader + transform wired together.
//!
//! [`SlipSession`] is the convenience layer for hosts that do not want to
//! execute `Effect::Fetch` themselves. It owns a [`SlipMachine`], an
//! optional injected [`PanelLoader`], and the per-panel transform, and
//! runs the loading pipeline inline when the location changes:
//!
//! 1. parse the slip sequence from the new search string,
//! 2. fan out one `load_panel` call per id, in sequence order,
//! 3. join all results — nothing is applied until every id resolved,
//! 4. decorate each result with its id, run the transform, drop
//!    not-found results,
//! 5. apply the surviving ordered list atomically via
//!    [`SlipMachine::batch_loaded`].
//!
//! A session constructed without a loader fails fatally
//! ([`SessionError::MissingLoader`]) as soon as a load is attempted: a
//! missing host capability is a configuration error, not something to
//! degrade around. A transport failure on any id aborts the whole batch
//! and leaves the collection untouched.

use std::fmt;

use slips_core::panel::Panel;
use slips_core::visibility::{ScrollSample, VisibilityState};
use slips_core::SlipConfig;

use crate::effect::Effect;
use crate::loader::{LoadError, PanelLoader};
use crate::machine::SlipMachine;

/// Per-panel post-processing hook: raw payload in, panel data out.
///
/// Returning `None` marks the panel as not found and drops it from the
/// batch.
pub type PanelTransform<R, T> = Box<dyn Fn(R, &str) -> Option<T>>;

/// Errors surfaced by the session's loading pipeline.
#[derive(Debug)]
pub enum SessionError {
    /// No fetch-by-id capability was injected. Fatal precondition failure.
    MissingLoader,
    /// A panel fetch failed at the transport level.
    Load(LoadError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLoader => {
                write!(f, "slip loading requires a panel loader capability from the host")
            }
            Self::Load(err) => write!(f, "panel batch aborted: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingLoader => None,
            Self::Load(err) => Some(err),
        }
    }
}

impl From<LoadError> for SessionError {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}

/// A slip machine bound to its host capabilities.
pub struct SlipSession<T, L: PanelLoader> {
    machine: SlipMachine<T>,
    loader: Option<L>,
    transform: PanelTransform<L::Raw, T>,
}

impl<T, L> SlipSession<T, L>
where
    T: Clone + PartialEq,
    L: PanelLoader,
{
    /// Create a session.
    ///
    /// `loader` is the injected fetch-by-id capability; passing `None`
    /// builds a display-only session whose first load attempt fails with
    /// [`SessionError::MissingLoader`]. `transform` post-processes every
    /// fetched payload; return `None` to drop a panel as not found.
    pub fn new(
        config: SlipConfig,
        loader: Option<L>,
        transform: impl Fn(L::Raw, &str) -> Option<T> + 'static,
    ) -> Self {
        Self {
            machine: SlipMachine::new(config),
            loader,
            transform: Box::new(transform),
        }
    }

    // -----------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------

    /// React to a host location change, loading the slip batch inline.
    ///
    /// Returns the outward effects (scroll instructions) produced once the
    /// batch applied, or nothing when the slip sequence is unchanged.
    pub fn handle_location(&mut self, search: &str) -> Result<Vec<Effect>, SessionError> {
        let Some(batch) = self.machine.location_changed(search) else {
            return Ok(Vec::new());
        };
        let loader = self.loader.as_ref().ok_or(SessionError::MissingLoader)?;

        // Fan out in request order; a transport failure aborts the batch
        // before anything is applied.
        let mut raw = Vec::with_capacity(batch.ids.len());
        for id in &batch.ids {
            raw.push((id.clone(), loader.load_panel(id)?));
        }

        // Joint apply: decorate, transform, drop not-found.
        let panels: Vec<Panel<T>> = raw
            .into_iter()
            .filter_map(|(id, payload)| {
                let data = payload.and_then(|payload| (self.transform)(payload, &id));
                if data.is_none() {
                    tracing::debug!(target: "slips.session", id = %id, "dropping not-found panel");
                }
                data.map(|data| Panel { id, data })
            })
            .collect();

        Ok(self.machine.batch_loaded(batch.generation, panels))
    }

    // -----------------------------------------------------------------
    // Pass-throughs
    // -----------------------------------------------------------------

    /// Install or remove the root panel. See [`SlipMachine::set_root`].
    pub fn set_root(&mut self, root: Option<Panel<T>>) -> Vec<Effect> {
        self.machine.set_root(root)
    }

    /// Navigate to a slip. See [`SlipMachine::navigate_to_slip`].
    pub fn navigate_to_slip(&mut self, to: &str, origin_index: usize) -> Option<Effect> {
        self.machine.navigate_to_slip(to, origin_index)
    }

    /// Set or toggle a highlight. See [`SlipMachine::highlight_slip`].
    pub fn highlight_slip(&mut self, id: &str, highlighted: Option<bool>) {
        self.machine.highlight_slip(id, highlighted);
    }

    /// Feed a throttled viewport sample.
    pub fn scroll_sample(&mut self, sample: ScrollSample) {
        self.machine.scroll_sample(sample);
    }

    /// The viewport was detached.
    pub fn container_detached(&mut self) {
        self.machine.container_detached();
    }

    /// The ordered panel list.
    #[must_use]
    pub fn panels(&self) -> &[Panel<T>] {
        self.machine.panels()
    }

    /// Visibility state for one panel id.
    #[must_use]
    pub fn state_of(&self, id: &str) -> Option<VisibilityState> {
        self.machine.state_of(id)
    }

    /// Panel plus state at an index. See [`SlipMachine::panel_at`].
    #[must_use]
    pub fn panel_at(&self, index: usize) -> Option<(&Panel<T>, VisibilityState)> {
        self.machine.panel_at(index)
    }

    /// Direct access to the underlying machine.
    #[must_use]
    pub fn machine(&self) -> &SlipMachine<T> {
        &self.machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapLoader {
        pages: HashMap<String, String>,
        fail: Option<String>,
    }

    impl MapLoader {
        fn with(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(id, data)| (id.to_string(), data.to_string()))
                    .collect(),
                fail: None,
            }
        }
    }

    impl PanelLoader for MapLoader {
        type Raw = String;

        fn load_panel(&self, id: &str) -> Result<Option<String>, LoadError> {
            if self.fail.as_deref() == Some(id) {
                return Err(LoadError::new(id, "boom"));
            }
            Ok(self.pages.get(id).cloned())
        }
    }

    fn session(loader: Option<MapLoader>) -> SlipSession<String, MapLoader> {
        SlipSession::new(SlipConfig::default(), loader, |raw, _| Some(raw))
    }

    fn ids(s: &SlipSession<String, MapLoader>) -> Vec<&str> {
        s.panels().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn missing_loader_is_fatal() {
        let mut s = session(None);
        let err = s.handle_location("?slip=noteA").unwrap_err();
        assert!(matches!(err, SessionError::MissingLoader));
    }

    #[test]
    fn missing_loader_checked_even_for_empty_sequence() {
        let mut s = session(None);
        let _ = s.machine.location_changed("?slip=a");
        // Going back to an empty sequence still exercises the pipeline.
        assert!(s.handle_location("").is_err());
    }

    #[test]
    fn unchanged_sequence_needs_no_loader() {
        let mut s = session(None);
        assert!(s.handle_location("").unwrap().is_empty());
    }

    #[test]
    fn loads_batch_in_request_order() {
        let mut s = session(Some(MapLoader::with(&[("a", "A"), ("b", "B")])));
        s.set_root(Some(Panel::new("root", "R".to_string())));
        let effects = s.handle_location("?slip=b&slip=a").unwrap();
        assert_eq!(ids(&s), vec!["root", "b", "a"]);
        assert_eq!(effects, vec![Effect::scroll_to(625.0 * 4.0)]);
    }

    #[test]
    fn not_found_panels_are_dropped_silently() {
        let mut s = session(Some(MapLoader::with(&[("b", "B")])));
        s.set_root(Some(Panel::new("root", "R".to_string())));
        s.handle_location("?slip=a&slip=b").unwrap();
        assert_eq!(ids(&s), vec!["root", "b"]);
    }

    #[test]
    fn transform_none_counts_as_not_found() {
        let loader = MapLoader::with(&[("a", "A"), ("b", "B")]);
        let mut s: SlipSession<String, MapLoader> =
            SlipSession::new(SlipConfig::default(), Some(loader), |raw, _| {
                (raw != "A").then_some(raw)
            });
        s.handle_location("?slip=a&slip=b").unwrap();
        assert_eq!(ids(&s), vec!["b"]);
    }

    #[test]
    fn transport_failure_aborts_whole_batch() {
        let mut loader = MapLoader::with(&[("a", "A"), ("b", "B")]);
        loader.fail = Some("b".to_string());
        let mut s = session(Some(loader));
        s.set_root(Some(Panel::new("root", "R".to_string())));

        let err = s.handle_location("?slip=a&slip=b").unwrap_err();
        assert!(matches!(err, SessionError::Load(_)));
        // No partial apply.
        assert_eq!(ids(&s), vec!["root"]);
    }

    #[test]
    fn transform_receives_the_id() {
        let loader = MapLoader::with(&[("a", "A")]);
        let mut s: SlipSession<String, MapLoader> =
            SlipSession::new(SlipConfig::default(), Some(loader), |raw, id| {
                Some(format!("{id}:{raw}"))
            });
        s.handle_location("?slip=a").unwrap();
        assert_eq!(s.panels()[0].data, "a:A");
    }
}
