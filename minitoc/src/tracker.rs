//! Active-heading tracker
//!
//! Decides which heading is "current" from three competing signals: the
//! scroll position (via [`Geometry`]), an explicit link click and the URL
//! fragment. The tracker is a plain state object; the caller feeds it
//! events and geometry and mirrors [`Tracker::active_id`] onto the list.
//!
//! # Transitions
//!
//! - **Start**: a non-empty fragment pins it, otherwise unpinned.
//! - **Click**: pins the target and highlights it at once.
//! - **Fragment change**: a known heading is pinned; anything else unpins
//!   and re-evaluates immediately.
//! - **Evaluate**: a pin survives only while its heading is inside the
//!   visibility band. Unpinned, the visible heading closest to the target
//!   line wins (earlier heading on ties). With nothing visible the previous
//!   highlight is kept, or the first heading on the very first evaluation.

use crate::visibility::{Rect, VisibilityBand};

/// Read-only viewport geometry
pub trait Geometry {
    /// Current viewport height in CSS pixels
    fn viewport_height(&self) -> f64;

    /// Bounding rectangle of the element with identifier `id`
    fn rect_of(&self, id: &str) -> Option<Rect>;
}

/// Mutable state of the tracker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    /// Heading fixed by a click or fragment; overrides scroll-derived choices while set
    pub pinned_id: Option<String>,
    /// Heading currently highlighted
    pub active_id: Option<String>,
}

/// Tracker mode derived from [`TrackerState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    /// Highlight follows the scroll position
    Unpinned,
    /// Highlight is fixed to a heading chosen by the reader
    Pinned(&'a str),
}

impl TrackerState {
    /// Current mode
    pub fn mode(&self) -> Mode<'_> {
        match &self.pinned_id {
            Some(id) => Mode::Pinned(id),
            None => Mode::Unpinned,
        }
    }
}

/// State machine selecting the active heading
#[derive(Debug, Clone)]
pub struct Tracker {
    order: Vec<String>,
    band: VisibilityBand,
    state: TrackerState,
}

impl Tracker {
    /// Create an unpinned tracker over heading identifiers in document order
    pub fn new(order: Vec<String>, band: VisibilityBand) -> Self {
        Self {
            order,
            band,
            state: TrackerState::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Identifier of the active heading
    pub fn active_id(&self) -> Option<&str> {
        self.state.active_id.as_deref()
    }

    /// Whether `id` belongs to a tracked heading
    pub fn is_known(&self, id: &str) -> bool {
        self.order.iter().any(|known| known == id)
    }

    /// Initialise from the URL fragment present at page load
    ///
    /// A known fragment is highlighted immediately so the first paint
    /// already shows it, before any visibility signal arrives.
    pub fn start(&mut self, fragment: Option<&str>) {
        self.state = TrackerState::default();

        if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
            self.state.pinned_id = Some(fragment.to_string());
            if self.is_known(fragment) {
                self.state.active_id = Some(fragment.to_string());
            }
        }
    }

    /// Pin the heading the reader clicked
    ///
    /// # Returns
    /// * `true` - `id` is a known heading, now pinned and active
    /// * `false` - `id` is unknown; state is unchanged
    pub fn pin(&mut self, id: &str) -> bool {
        if !self.is_known(id) {
            log::debug!("Ignoring pin request for unknown heading '{}'", id);
            return false;
        }
        self.state.pinned_id = Some(id.to_string());
        self.state.active_id = Some(id.to_string());
        true
    }

    /// React to a fragment change (back/forward, programmatic hash change)
    pub fn fragment_changed<G: Geometry + ?Sized>(
        &mut self,
        fragment: Option<&str>,
        geometry: &G,
    ) -> Option<&str> {
        match fragment {
            Some(id) if self.is_known(id) => {
                self.pin(id);
            }
            _ => {
                self.state.pinned_id = None;
                self.evaluate(geometry);
            }
        }
        self.active_id()
    }

    /// Re-evaluate the active heading against the current geometry
    pub fn evaluate<G: Geometry + ?Sized>(&mut self, geometry: &G) -> Option<&str> {
        if let Some(pinned) = self.state.pinned_id.take() {
            if self.pinned_is_visible(&pinned, geometry) {
                self.state.active_id = Some(pinned.clone());
                self.state.pinned_id = Some(pinned);
                return self.active_id();
            }
            log::debug!("Pinned heading '{}' left the visibility band", pinned);
        }

        match closest_visible(&self.order, geometry, &self.band) {
            Some(id) => self.state.active_id = Some(id.to_string()),
            None if self.state.active_id.is_none() => {
                self.state.active_id = self.order.first().cloned();
            }
            None => {}
        }

        self.active_id()
    }

    fn pinned_is_visible<G: Geometry + ?Sized>(&self, id: &str, geometry: &G) -> bool {
        self.is_known(id)
            && geometry
                .rect_of(id)
                .is_some_and(|rect| self.band.contains(rect, geometry.viewport_height()))
    }
}

/// Pick the visible heading whose top edge is closest to the target line
///
/// Scans in document order and only replaces the best candidate on a
/// strictly higher score, so the earlier heading wins ties.
pub fn closest_visible<'a, G: Geometry + ?Sized>(
    order: &'a [String],
    geometry: &G,
    band: &VisibilityBand,
) -> Option<&'a str> {
    let viewport_height = geometry.viewport_height();
    let mut best: Option<(&'a str, f64)> = None;

    for id in order {
        let Some(rect) = geometry.rect_of(id) else {
            continue;
        };
        if !band.contains(rect, viewport_height) {
            continue;
        }
        let score = band.score(rect, viewport_height);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((id.as_str(), score));
        }
    }

    best.map(|(id, _)| id)
}
