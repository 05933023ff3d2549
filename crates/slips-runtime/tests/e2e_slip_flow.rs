//! End-to-end flow: navigation command → route request → location change
//! → batch load → reclassification, driven the way a host would drive it.

use std::collections::HashMap;

use slips_runtime::{
    Effect, LoadError, Panel, PanelLoader, ScrollSample, SlipConfig, SlipSession,
};

struct NoteStore {
    notes: HashMap<String, String>,
}

impl NoteStore {
    fn new(notes: &[(&str, &str)]) -> Self {
        Self {
            notes: notes
                .iter()
                .map(|(id, body)| (id.to_string(), body.to_string()))
                .collect(),
        }
    }
}

impl PanelLoader for NoteStore {
    type Raw = String;

    fn load_panel(&self, id: &str) -> Result<Option<String>, LoadError> {
        Ok(self.notes.get(id).cloned())
    }
}

fn note_session(notes: &[(&str, &str)]) -> SlipSession<String, NoteStore> {
    SlipSession::new(
        SlipConfig::default(),
        Some(NoteStore::new(notes)),
        |raw, _| Some(raw),
    )
}

#[test]
fn navigate_to_new_slip_loads_and_focuses_it() {
    let mut session = note_session(&[("noteA", "alpha")]);
    session.set_root(Some(Panel::new("root", "home".to_string())));

    // Target not loaded: the machine asks the host to mutate the route.
    let effect = session.navigate_to_slip("noteA", 0).unwrap();
    let Effect::RequestRoute { query } = effect else {
        panic!("expected a route request, got {effect:?}");
    };
    assert_eq!(query, "slip=noteA");

    // The host routes and reports the settled location back.
    let effects = session.handle_location(&format!("?{query}")).unwrap();

    let ids: Vec<&str> = session.panels().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "noteA"]);
    assert_eq!(session.panels()[1].data, "alpha");
    assert!(session.state_of("noteA").unwrap().active);
    // Viewport is pushed toward the freshly extended end of the stack.
    assert_eq!(effects, vec![Effect::scroll_to(625.0 * 3.0)]);
}

#[test]
fn navigating_to_a_loaded_slip_never_fetches() {
    let mut session = note_session(&[("noteA", "alpha")]);
    session.set_root(Some(Panel::new("root", "home".to_string())));
    session.handle_location("?slip=noteA").unwrap();

    // Second navigation resolves in place: one scroll instruction, no
    // route request, no change to the collection.
    let before: Vec<String> = session.panels().iter().map(|p| p.id.clone()).collect();
    let effect = session.navigate_to_slip("noteA", 0).unwrap();
    assert_eq!(effect, Effect::scroll_to(625.0 - (40.0 - 1.0)));
    let after: Vec<String> = session.panels().iter().map(|p| p.id.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn not_found_slips_shorten_the_sequence() {
    let mut session = note_session(&[("b", "beta")]);
    session.set_root(Some(Panel::new("root", "home".to_string())));
    session.handle_location("?slip=a&slip=b").unwrap();

    let ids: Vec<&str> = session.panels().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "b"]);
}

#[test]
fn scroll_and_detach_drive_classification() {
    let mut session = note_session(&[("noteA", "alpha")]);
    session.set_root(Some(Panel::new("root", "home".to_string())));
    session.handle_location("?slip=noteA").unwrap();

    // Before any sample the conservative default applies.
    assert!(session.state_of("root").unwrap().overlay);

    session.scroll_sample(ScrollSample::new(0.0, 800.0));
    assert!(!session.state_of("root").unwrap().overlay);

    session.container_detached();
    assert!(session.state_of("root").unwrap().overlay);
    assert!(!session.state_of("root").unwrap().obstructed);
}

#[test]
fn highlight_survives_only_until_next_recompute() {
    let mut session = note_session(&[]);
    session.set_root(Some(Panel::new("root", "home".to_string())));

    session.highlight_slip("root", None);
    assert!(session.state_of("root").unwrap().highlighted);

    session.scroll_sample(ScrollSample::new(0.0, 800.0));
    assert!(!session.state_of("root").unwrap().highlighted);
}

#[test]
fn root_swap_keeps_loaded_slips() {
    let mut session = note_session(&[("noteA", "alpha")]);
    session.set_root(Some(Panel::new("home", "v1".to_string())));
    session.handle_location("?slip=noteA").unwrap();

    session.set_root(Some(Panel::new("home", "v2".to_string())));
    let ids: Vec<&str> = session.panels().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["home", "noteA"]);
    assert_eq!(session.panels()[0].data, "v2");
}
