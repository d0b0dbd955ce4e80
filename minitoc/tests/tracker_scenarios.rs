//! End-to-end behaviour of the contents panel over an in-memory page

use minitoc::{
    Geometry, HeadingNode, MiniToc, Mode, Mount, PageHost, Rect, TocConfig, TocEvent, TocList,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

const HEADING_HEIGHT: f64 = 30.0;

struct FakeNode {
    index: usize,
    level: u8,
    text: String,
    id: Option<String>,
    page_ids: Rc<RefCell<Vec<Option<String>>>>,
}

impl HeadingNode for FakeNode {
    fn level(&self) -> u8 {
        self.level
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn explicit_id(&self) -> Option<String> {
        self.id.clone()
    }

    fn assign_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
        self.page_ids.borrow_mut()[self.index] = Some(id.to_string());
    }
}

/// A page with headings, a list container and adjustable scroll geometry
struct FakePage {
    headings: Vec<(u8, String)>,
    ids: Rc<RefCell<Vec<Option<String>>>>,
    has_content: bool,
    has_list: bool,
    viewport_height: f64,
    tops: HashMap<String, f64>,
    rendered: Vec<String>,
    highlighted: HashSet<String>,
    panel_hidden: bool,
    fragment: Option<String>,
    /// Ids carried by non-heading elements elsewhere on the page
    other_ids: Vec<String>,
}

impl FakePage {
    fn new(headings: &[(u8, &str)]) -> Self {
        Self {
            headings: headings
                .iter()
                .map(|&(level, text)| (level, text.to_string()))
                .collect(),
            ids: Rc::new(RefCell::new(vec![None; headings.len()])),
            has_content: true,
            has_list: true,
            viewport_height: 1000.0,
            tops: HashMap::new(),
            rendered: Vec::new(),
            highlighted: HashSet::new(),
            panel_hidden: false,
            fragment: None,
            other_ids: Vec::new(),
        }
    }

    fn with_explicit_id(self, index: usize, id: &str) -> Self {
        self.ids.borrow_mut()[index] = Some(id.to_string());
        self
    }

    fn with_fragment(mut self, fragment: &str) -> Self {
        self.fragment = Some(fragment.to_string());
        self
    }

    /// Place headings at the given top offsets; unlisted headings are far below
    fn scroll(&mut self, tops: &[(&str, f64)]) {
        self.tops = tops
            .iter()
            .map(|&(id, top)| (id.to_string(), top))
            .collect();
    }

    fn page_ids(&self) -> Vec<Option<String>> {
        self.ids.borrow().clone()
    }
}

impl Geometry for FakePage {
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn rect_of(&self, id: &str) -> Option<Rect> {
        let top = self.tops.get(id).copied().unwrap_or(10_000.0);
        Some(Rect::new(top, top + HEADING_HEIGHT))
    }
}

impl PageHost for FakePage {
    type Node = FakeNode;

    fn content_headings(&mut self, _config: &TocConfig) -> Option<Vec<FakeNode>> {
        if !self.has_content {
            return None;
        }
        let ids = self.ids.borrow().clone();
        Some(
            self.headings
                .iter()
                .zip(ids)
                .enumerate()
                .map(|(index, ((level, text), id))| FakeNode {
                    index,
                    level: *level,
                    text: text.clone(),
                    id,
                    page_ids: Rc::clone(&self.ids),
                })
                .collect(),
        )
    }

    fn reserved_ids(&self) -> Vec<String> {
        self.other_ids.clone()
    }

    fn has_list(&self) -> bool {
        self.has_list
    }

    fn render_list(&mut self, list: &TocList) {
        self.rendered = list.ids().map(str::to_string).collect();
        self.highlighted.clear();
    }

    fn set_highlighted(&mut self, id: &str, highlighted: bool) {
        if highlighted {
            self.highlighted.insert(id.to_string());
        } else {
            self.highlighted.remove(id);
        }
    }

    fn hide_panel(&mut self) {
        self.panel_hidden = true;
    }

    fn current_fragment(&self) -> Option<String> {
        self.fragment.clone()
    }
}

fn mount(page: FakePage) -> MiniToc<FakePage> {
    match MiniToc::setup(page, &TocConfig::default()) {
        Mount::Active(toc) => toc,
        Mount::Hidden => panic!("expected an active panel, but it was hidden"),
        Mount::Absent => panic!("expected an active panel, but the page has none"),
    }
}

fn highlighted(toc: &MiniToc<FakePage>) -> Vec<String> {
    let mut from_host: Vec<String> = toc.host().highlighted.iter().cloned().collect();
    from_host.sort();
    let mut from_list: Vec<String> = toc
        .list()
        .entries()
        .iter()
        .filter(|entry| entry.highlighted)
        .map(|entry| entry.id.clone())
        .collect();
    from_list.sort();
    assert_eq!(from_host, from_list, "host and list disagree");
    from_list
}

fn sample_page() -> FakePage {
    FakePage::new(&[
        (2, "Introduction"),
        (2, "Install"),
        (3, "From source"),
        (2, "Usage"),
    ])
}

#[test]
fn test_setup_highlights_exactly_one_entry() {
    let toc = mount(sample_page());

    assert_eq!(toc.host().rendered.len(), 4);
    // Nothing is in view yet, so the first heading is the default
    assert_eq!(highlighted(&toc), vec!["introduction"]);
}

#[test]
fn test_setup_picks_heading_in_view() {
    let mut page = sample_page();
    page.scroll(&[("introduction", -400.0), ("install", 320.0), ("from-source", 700.0)]);

    let toc = mount(page);

    assert_eq!(highlighted(&toc), vec!["install"]);
}

#[test]
fn test_empty_document_hides_panel() {
    let mut page = FakePage::new(&[(2, "   "), (3, "")]);
    page.rendered = vec!["stale".to_string()];

    assert!(matches!(
        MiniToc::setup(FakePageRef(&mut page), &TocConfig::default()),
        Mount::Hidden
    ));
    assert!(page.panel_hidden);
    assert!(page.rendered.is_empty());
    assert!(page.highlighted.is_empty());
}

#[test]
fn test_missing_anchors_are_a_silent_no_op() {
    let mut page = sample_page();
    page.has_list = false;
    assert!(matches!(
        MiniToc::setup(FakePageRef(&mut page), &TocConfig::default()),
        Mount::Absent
    ));
    assert!(page.rendered.is_empty());
    assert!(!page.panel_hidden);

    let mut page = sample_page();
    page.has_content = false;
    assert!(matches!(
        MiniToc::setup(FakePageRef(&mut page), &TocConfig::default()),
        Mount::Absent
    ));
    assert!(page.rendered.is_empty());
    assert!(page.page_ids().iter().all(Option::is_none));
}

#[test]
fn test_ids_never_collide_with_the_rest_of_the_page() {
    let mut page =
        FakePage::new(&[(2, ""), (2, "Intro"), (2, "Usage")]).with_explicit_id(0, "intro");
    page.other_ids = vec!["usage".to_string()];

    let toc = mount(page);

    assert_eq!(
        toc.host().page_ids(),
        vec![
            Some("intro".to_string()),
            Some("intro-2".to_string()),
            Some("usage-2".to_string()),
        ]
    );
    assert_eq!(toc.host().rendered, vec!["intro-2", "usage-2"]);
}

#[test]
fn test_duplicate_titles_get_distinct_ids() {
    let page = FakePage::new(&[(2, "Overview"), (3, "Details"), (2, "Overview")])
        .with_explicit_id(1, "custom");

    let toc = mount(page);

    assert_eq!(
        toc.host().page_ids(),
        vec![
            Some("overview".to_string()),
            Some("custom".to_string()),
            Some("overview-2".to_string()),
        ]
    );
    assert_eq!(toc.host().rendered, vec!["overview", "custom", "overview-2"]);
}

#[test]
fn test_click_takes_precedence_over_scroll() {
    let mut toc = mount(sample_page());
    toc.host_mut()
        .scroll(&[("introduction", 340.0), ("install", 1500.0)]);
    toc.dispatch(TocEvent::Visibility);
    assert_eq!(highlighted(&toc), vec!["introduction"]);

    // Click "Usage", which is far below the viewport
    toc.dispatch(TocEvent::Click(Some("usage".to_string())));
    assert_eq!(highlighted(&toc), vec!["usage"]);
    assert_eq!(toc.state().mode(), Mode::Pinned("usage"));

    // The browser scrolls the target into view; "from-source" is closer to
    // the target line but the pin holds
    toc.host_mut()
        .scroll(&[("from-source", 340.0), ("usage", 700.0)]);
    toc.dispatch(TocEvent::Visibility);
    assert_eq!(highlighted(&toc), vec!["usage"]);

    // Scrolling "usage" out of the band hands control back to the scroll position
    toc.host_mut().scroll(&[
        ("introduction", -900.0),
        ("install", 120.0),
        ("from-source", 360.0),
        ("usage", -200.0),
    ]);
    toc.dispatch(TocEvent::Visibility);
    assert_eq!(toc.state().mode(), Mode::Unpinned);
    assert_eq!(highlighted(&toc), vec!["from-source"]);
}

#[test]
fn test_fragment_highlights_on_first_paint() {
    let page = sample_page().with_fragment("install");

    // No geometry and no visibility events yet
    let toc = mount(page);

    assert_eq!(highlighted(&toc), vec!["install"]);
    assert_eq!(toc.state().mode(), Mode::Pinned("install"));
}

#[test]
fn test_unknown_fragment_on_load_falls_back_to_scroll() {
    let mut page = sample_page().with_fragment("not-a-heading");
    page.scroll(&[("usage", 350.0)]);

    let toc = mount(page);

    assert_eq!(highlighted(&toc), vec!["usage"]);
    assert_eq!(toc.state().mode(), Mode::Unpinned);
}

#[test]
fn test_fragment_change() {
    let mut toc = mount(sample_page());
    toc.host_mut().scroll(&[("introduction", 350.0)]);

    toc.dispatch(TocEvent::FragmentChanged(Some("usage".to_string())));
    assert_eq!(highlighted(&toc), vec!["usage"]);
    assert_eq!(toc.state().mode(), Mode::Pinned("usage"));

    toc.dispatch(TocEvent::FragmentChanged(Some("bogus".to_string())));
    assert_eq!(highlighted(&toc), vec!["introduction"]);
    assert_eq!(toc.state().mode(), Mode::Unpinned);
}

#[test]
fn test_last_event_wins() {
    let mut toc = mount(sample_page());

    toc.dispatch(TocEvent::Click(Some("install".to_string())));
    toc.dispatch(TocEvent::FragmentChanged(Some("usage".to_string())));
    assert_eq!(highlighted(&toc), vec!["usage"]);

    toc.dispatch(TocEvent::FragmentChanged(Some("usage".to_string())));
    toc.dispatch(TocEvent::Click(Some("install".to_string())));
    assert_eq!(highlighted(&toc), vec!["install"]);
}

#[test]
fn test_unusable_click_is_ignored() {
    let mut toc = mount(sample_page());
    let before = toc.state().clone();

    toc.dispatch(TocEvent::Click(None));
    toc.dispatch(TocEvent::Click(Some("nope".to_string())));

    assert_eq!(toc.state(), &before);
    assert_eq!(highlighted(&toc), vec!["introduction"]);
}

#[test]
fn test_tie_break_is_deterministic() {
    let mut toc = mount(sample_page());
    // Both 100px from the 350px target line
    toc.host_mut()
        .scroll(&[("install", 250.0), ("from-source", 450.0)]);

    for _ in 0..5 {
        toc.dispatch(TocEvent::Visibility);
        assert_eq!(highlighted(&toc), vec!["install"]);
    }
}

#[test]
fn test_no_flicker_when_nothing_is_visible() {
    let mut toc = mount(sample_page());
    toc.host_mut().scroll(&[("from-source", 300.0)]);
    toc.dispatch(TocEvent::Visibility);
    assert_eq!(highlighted(&toc), vec!["from-source"]);

    // Mid fast-scroll: every heading is outside the band
    toc.host_mut().scroll(&[
        ("introduction", -5000.0),
        ("install", -4000.0),
        ("from-source", -3000.0),
        ("usage", 5000.0),
    ]);
    toc.dispatch(TocEvent::Visibility);
    assert_eq!(highlighted(&toc), vec!["from-source"]);
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut toc = mount(sample_page());
    toc.dispatch(TocEvent::Click(Some("usage".to_string())));
    let entries = toc.list().clone();

    toc.rebuild();
    toc.rebuild();

    assert_eq!(toc.list(), &entries);
    assert_eq!(toc.host().rendered, vec!["introduction", "install", "from-source", "usage"]);
    assert_eq!(highlighted(&toc), vec!["usage"]);
}

#[test]
fn test_teardown_returns_host() {
    let toc = mount(sample_page());
    let page = toc.teardown();
    assert_eq!(page.rendered.len(), 4);
}

/// Lets a test keep ownership of the page while the component mutates it
struct FakePageRef<'a>(&'a mut FakePage);

impl Geometry for FakePageRef<'_> {
    fn viewport_height(&self) -> f64 {
        self.0.viewport_height()
    }

    fn rect_of(&self, id: &str) -> Option<Rect> {
        self.0.rect_of(id)
    }
}

impl PageHost for FakePageRef<'_> {
    type Node = FakeNode;

    fn content_headings(&mut self, config: &TocConfig) -> Option<Vec<FakeNode>> {
        self.0.content_headings(config)
    }

    fn reserved_ids(&self) -> Vec<String> {
        self.0.reserved_ids()
    }

    fn has_list(&self) -> bool {
        self.0.has_list()
    }

    fn render_list(&mut self, list: &TocList) {
        self.0.render_list(list)
    }

    fn set_highlighted(&mut self, id: &str, highlighted: bool) {
        self.0.set_highlighted(id, highlighted)
    }

    fn hide_panel(&mut self) {
        self.0.hide_panel()
    }

    fn current_fragment(&self) -> Option<String> {
        self.0.current_fragment()
    }
}
