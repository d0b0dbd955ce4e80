//! The table-of-contents component and its lifecycle
//!
//! [`MiniToc`] ties the collector, list builder and tracker to a
//! [`PageHost`]. It is constructed once per page load by [`MiniToc::setup`],
//! driven by [`MiniToc::dispatch`] from the host's event sources, and torn
//! down with [`MiniToc::teardown`].

use crate::config::TocConfig;
use crate::heading::{collect_headings_with, Heading, HeadingNode};
use crate::slug::IdRegistry;
use crate::toc_list::TocList;
use crate::tracker::{Geometry, Tracker, TrackerState};

/// The page the panel lives on
///
/// Implemented over the live DOM in the browser and by in-memory fakes in
/// tests.
pub trait PageHost: Geometry {
    /// Heading element handle
    type Node: HeadingNode;

    /// In-scope heading elements of the content region, in document order
    ///
    /// Returns `None` when the page has no content region.
    fn content_headings(&mut self, config: &TocConfig) -> Option<Vec<Self::Node>>;

    /// Identifiers already used on the page outside the collected headings
    fn reserved_ids(&self) -> Vec<String> {
        Vec::new()
    }

    /// Called once identifiers are assigned, with the candidate nodes and
    /// the headings that made it into the panel
    fn headings_collected(&mut self, _nodes: Vec<Self::Node>, _headings: &[Heading]) {}

    /// Whether the page provides a list container for the panel
    fn has_list(&self) -> bool;

    /// Replace the list container's content with `list`
    fn render_list(&mut self, list: &TocList);

    /// Toggle the highlight on the link for `id`
    fn set_highlighted(&mut self, id: &str, highlighted: bool);

    /// Hide the panel and widen the content to a single column
    fn hide_panel(&mut self);

    /// Current URL fragment, without the leading `#`
    fn current_fragment(&self) -> Option<String>;
}

/// Outcome of [`MiniToc::setup`]
#[derive(Debug)]
pub enum Mount<T> {
    /// Panel built and tracking
    Active(T),
    /// Document has no headings; the panel was hidden
    Hidden,
    /// Page lacks the content region or list container; nothing was touched
    Absent,
}

impl<T> Mount<T> {
    /// The mounted component, if any
    pub fn active(self) -> Option<T> {
        match self {
            Mount::Active(inner) => Some(inner),
            Mount::Hidden | Mount::Absent => None,
        }
    }
}

/// Runtime events the component reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocEvent {
    /// A heading entered or left the observed area, or a re-check was requested
    Visibility,
    /// The reader clicked a navigation link; `None` when the link has no usable fragment target
    Click(Option<String>),
    /// The URL fragment changed; `None` when it was cleared
    FragmentChanged(Option<String>),
}

/// A mounted table-of-contents panel
#[derive(Debug)]
pub struct MiniToc<H: PageHost> {
    host: H,
    headings: Vec<Heading>,
    list: TocList,
    tracker: Tracker,
}

impl<H: PageHost> MiniToc<H> {
    /// Build the panel on `host`
    ///
    /// Collects headings, assigns identifiers, renders the list and
    /// initialises the tracker from the current fragment. A known fragment
    /// is highlighted straight away; otherwise the tracker evaluates the
    /// current geometry so exactly one entry is highlighted after setup.
    pub fn setup(mut host: H, config: &TocConfig) -> Mount<Self> {
        if !host.has_list() {
            log::debug!("No '{}' on this page, skipping", config.list_selector);
            return Mount::Absent;
        }
        let Some(mut nodes) = host.content_headings(config) else {
            log::debug!("No '{}' on this page, skipping", config.content_selector);
            return Mount::Absent;
        };

        let mut registry = IdRegistry::new();
        for id in host.reserved_ids() {
            registry.reserve(&id);
        }
        let headings = collect_headings_with(&mut nodes, registry, config);
        host.headings_collected(nodes, &headings);
        if headings.is_empty() {
            log::info!("Document has no headings, hiding contents panel");
            host.render_list(&TocList::default());
            host.hide_panel();
            return Mount::Hidden;
        }

        let list = TocList::from_headings(&headings);
        host.render_list(&list);

        let order = headings.iter().map(|h| h.id.clone()).collect();
        let mut tracker = Tracker::new(order, config.band);
        let fragment = host.current_fragment();
        tracker.start(fragment.as_deref());

        let mut toc = Self {
            host,
            headings,
            list,
            tracker,
        };
        if toc.tracker.active_id().is_none() {
            toc.tracker.evaluate(&toc.host);
        }
        toc.sync_highlight();

        log::info!(
            "Contents panel ready with {} entries (active: {:?})",
            toc.list.len(),
            toc.list.highlighted()
        );
        Mount::Active(toc)
    }

    /// Feed one event through the tracker and update the highlight
    pub fn dispatch(&mut self, event: TocEvent) {
        match event {
            TocEvent::Visibility => {
                self.tracker.evaluate(&self.host);
            }
            TocEvent::Click(Some(id)) => {
                self.tracker.pin(&id);
            }
            TocEvent::Click(None) => return,
            TocEvent::FragmentChanged(fragment) => {
                self.tracker.fragment_changed(fragment.as_deref(), &self.host);
            }
        }
        self.sync_highlight();
    }

    /// Rebuild the list from the collected headings
    ///
    /// The highlighted entry is preserved and re-applied to the host.
    pub fn rebuild(&mut self) {
        self.list.build(&self.headings);
        self.host.render_list(&self.list);
        if let Some(id) = self.list.highlighted().map(str::to_string) {
            self.host.set_highlighted(&id, true);
        }
    }

    fn sync_highlight(&mut self) {
        let Some(active) = self.tracker.active_id() else {
            return;
        };
        if self.list.highlighted() == Some(active) {
            return;
        }
        let active = active.to_string();
        if let Some(previous) = self.list.highlight(&active) {
            if let Some(previous) = previous {
                self.host.set_highlighted(&previous, false);
            }
            self.host.set_highlighted(&active, true);
            log::debug!("Active heading is now '{}'", active);
        }
    }

    /// Collected headings in document order
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// The navigation list model
    pub fn list(&self) -> &TocList {
        &self.list
    }

    /// Current tracker state
    pub fn state(&self) -> &TrackerState {
        self.tracker.state()
    }

    /// The page host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the page host, e.g. to change geometry
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Tear the component down and hand the host back
    pub fn teardown(self) -> H {
        log::debug!("Contents panel torn down");
        self.host
    }
}
