//! Ordered panel collection with identity-based deduplication.
//!
//! A [`PanelCollection`] holds the root page (when one exists) at index 0
//! and every appended slip after it, in the order the slips were requested.
//! Fetch results never reorder the collection; they replace the appended
//! suffix wholesale via [`merge_append`](PanelCollection::merge_append).
//!
//! # Invariants
//!
//! 1. Panel ids are unique: no id appears at two positions.
//! 2. The root panel, when present, is at index 0.
//! 3. Appended panels keep request order, not fetch-resolution order.
//! 4. `reset_root` with a value-equal root is a no-op.
//!
//! # Failure Modes
//!
//! None — all operations are infallible; lookups return `Option`.

/// A loaded page keyed by a stable identifier ("slug").
///
/// Immutable once stored: the collection only ever replaces whole panels,
/// it never mutates `data` in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Panel<T> {
    /// Stable identifier, unique within a collection.
    pub id: String,
    /// Page payload. Opaque to the collection.
    pub data: T,
}

impl<T> Panel<T> {
    /// Create a panel from an id and its payload.
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Ordered sequence of loaded panels: optional root plus appended slips.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelCollection<T> {
    panels: Vec<Panel<T>>,
    has_root: bool,
}

impl<T> Default for PanelCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PanelCollection<T> {
    /// Create an empty collection (no root, no slips).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            panels: Vec::new(),
            has_root: false,
        }
    }

    /// All panels in order. Index 0 is the root when [`has_root`](Self::has_root).
    #[must_use]
    pub fn panels(&self) -> &[Panel<T>] {
        &self.panels
    }

    /// Number of panels, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// True when neither a root nor any slip is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Whether index 0 currently holds a root panel.
    #[must_use]
    pub fn has_root(&self) -> bool {
        self.has_root
    }

    /// The root panel, if one exists.
    #[must_use]
    pub fn root(&self) -> Option<&Panel<T>> {
        if self.has_root {
            self.panels.first()
        } else {
            None
        }
    }

    /// The appended slips (everything after the root).
    #[must_use]
    pub fn appended(&self) -> &[Panel<T>] {
        &self.panels[usize::from(self.has_root)..]
    }

    /// Panel at `index`, if loaded.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Panel<T>> {
        self.panels.get(index)
    }

    /// Position of the panel with the given id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.id == id)
    }

    /// Replace the appended suffix with `fetched`, keeping the root.
    ///
    /// This is authoritative: previously appended slips that are not in
    /// `fetched` are gone afterwards. Callers drop not-found results before
    /// calling; the collection only enforces id uniqueness (a fetched panel
    /// duplicating the root id or an earlier fetched id is skipped).
    pub fn merge_append(&mut self, fetched: Vec<Panel<T>>) {
        self.panels.truncate(usize::from(self.has_root));
        for panel in fetched {
            if self.index_of(&panel.id).is_none() {
                self.panels.push(panel);
            }
        }
    }
}

impl<T: PartialEq> PanelCollection<T> {
    /// Install a new root panel, comparing by value with the current one.
    ///
    /// Returns `true` when the collection changed:
    ///
    /// - value-equal root → no-op, `false`;
    /// - new root with a previous root → `[new_root]` followed by the old
    ///   appended suffix;
    /// - new root without a previous root → `[new_root]` followed by the
    ///   whole old sequence;
    /// - `None` → the collection is emptied.
    ///
    /// Appended panels whose id collides with the new root are dropped to
    /// keep ids unique.
    pub fn reset_root(&mut self, new_root: Option<Panel<T>>) -> bool {
        match new_root {
            None => {
                if !self.has_root && self.panels.is_empty() {
                    return false;
                }
                self.panels.clear();
                self.has_root = false;
                true
            }
            Some(root) => {
                if self.has_root && self.panels.first() == Some(&root) {
                    return false;
                }
                let keep_from = usize::from(self.has_root);
                let old: Vec<Panel<T>> = self.panels.drain(..).collect();
                self.panels.push(root);
                for panel in old.into_iter().skip(keep_from) {
                    if self.index_of(&panel.id).is_none() {
                        self.panels.push(panel);
                    }
                }
                self.has_root = true;
                true
            }
        }
    }
}
