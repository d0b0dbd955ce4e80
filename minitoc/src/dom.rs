//! Browser binding
//!
//! Wires the target-agnostic [`MiniToc`] to the live DOM:
//!
//! - [`DomHost`] implements [`PageHost`] over the content region, the list
//!   container and `getBoundingClientRect`.
//! - One `IntersectionObserver` over every heading is the visibility
//!   oracle. Each callback, including the initial one the browser delivers
//!   right after `observe`, dispatches [`TocEvent::Visibility`].
//! - Clicks are delegated on the list element. The click pins at once and
//!   the re-check runs on the next animation frame, after the browser has
//!   scrolled to the fragment.
//! - `hashchange` dispatches [`TocEvent::FragmentChanged`]; `pagehide`
//!   tears everything down unless the page is going into the back/forward
//!   cache, in which case the panel keeps working when the reader returns.
//!
//! The returned handle owns the panel. Keep a reference to it for as long
//! as the page lives; dropping it disconnects the panel.
//!
//! ```javascript
//! import init, { mountMiniToc } from './minitoc.js';
//!
//! await init();
//! const toc = mountMiniToc({ active_class: 'is-active' });
//! ```

use crate::config::TocConfig;
use crate::error::ConfigError;
use crate::fragment::{fragment_from_hash, link_target};
use crate::heading::{Heading, HeadingNode};
use crate::panel::{MiniToc, Mount, PageHost, TocEvent};
use crate::render::{item_classes, link_classes};
use crate::toc_list::{NavEntry, TocList};
use crate::tracker::Geometry;
use crate::visibility::Rect;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, IntersectionObserver, IntersectionObserverInit, MouseEvent,
    PageTransitionEvent, Window,
};

/// A heading element in the live document
pub struct DomHeading(Element);

impl HeadingNode for DomHeading {
    fn level(&self) -> u8 {
        self.0
            .tag_name()
            .to_ascii_lowercase()
            .strip_prefix('h')
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn explicit_id(&self) -> Option<String> {
        let id = self.0.id();
        (!id.is_empty()).then_some(id)
    }

    fn assign_id(&mut self, id: &str) {
        self.0.set_id(id);
    }
}

/// The current page, seen through the configured selectors
pub struct DomHost {
    window: Window,
    document: Document,
    content: Option<Element>,
    list: Option<Element>,
    panel: Option<Element>,
    layout: Option<Element>,
    links: HashMap<String, Element>,
    /// Heading element behind each panel entry
    targets: HashMap<String, Element>,
    config: TocConfig,
}

impl DomHost {
    /// Resolve the page anchors named by `config`
    pub fn new(window: Window, document: Document, config: TocConfig) -> Self {
        let find = |selector: &str| document.query_selector(selector).ok().flatten();
        let content = find(&config.content_selector);
        let list = find(&config.list_selector);
        let panel = find(&config.panel_selector);
        let layout = find(&config.layout_selector);

        Self {
            window,
            document,
            content,
            list,
            panel,
            layout,
            links: HashMap::new(),
            targets: HashMap::new(),
            config,
        }
    }

    fn build_item(&self, entry: &NavEntry) -> Result<(Element, Element), JsValue> {
        let item = self.document.create_element("li")?;
        item.set_class_name(&item_classes(entry, &self.config));

        let link = self.document.create_element("a")?;
        link.set_class_name(&link_classes(entry, &self.config));
        link.set_attribute("href", &entry.href())?;
        link.set_text_content(Some(&entry.text));

        item.append_child(&link)?;
        Ok((item, link))
    }
}

impl Geometry for DomHost {
    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }

    fn rect_of(&self, id: &str) -> Option<Rect> {
        let element = self.targets.get(id)?;
        let rect = element.get_bounding_client_rect();
        Some(Rect::new(rect.top(), rect.bottom()))
    }
}

impl PageHost for DomHost {
    type Node = DomHeading;

    fn content_headings(&mut self, config: &TocConfig) -> Option<Vec<DomHeading>> {
        let content = self.content.as_ref()?;
        let nodes = match content.query_selector_all(&config.heading_selector()) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("Invalid heading selector: {:?}", err);
                return Some(Vec::new());
            }
        };

        let headings = (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(DomHeading)
            .collect();
        Some(headings)
    }

    fn reserved_ids(&self) -> Vec<String> {
        let nodes = match self.document.query_selector_all("[id]") {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("Failed to list page identifiers: {:?}", err);
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| element.id())
            .filter(|id| !id.is_empty())
            .collect()
    }

    fn headings_collected(&mut self, nodes: Vec<DomHeading>, headings: &[Heading]) {
        let listed: HashSet<&str> = headings.iter().map(|h| h.id.as_str()).collect();
        self.targets.clear();
        // First non-empty heading carrying each id, the same one the collector kept
        for DomHeading(element) in nodes {
            if element.text_content().unwrap_or_default().trim().is_empty() {
                continue;
            }
            let id = element.id();
            if listed.contains(id.as_str()) {
                self.targets.entry(id).or_insert(element);
            }
        }
    }

    fn has_list(&self) -> bool {
        self.list.is_some()
    }

    fn render_list(&mut self, list: &TocList) {
        let Some(container) = self.list.clone() else {
            return;
        };
        container.set_inner_html("");
        self.links.clear();

        for entry in list.entries() {
            match self.build_item(entry) {
                Ok((item, link)) => {
                    if let Err(err) = container.append_child(&item) {
                        log::warn!("Failed to append entry '{}': {:?}", entry.id, err);
                        continue;
                    }
                    self.links.insert(entry.id.clone(), link);
                }
                Err(err) => log::warn!("Failed to build entry '{}': {:?}", entry.id, err),
            }
        }
    }

    fn set_highlighted(&mut self, id: &str, highlighted: bool) {
        if let Some(link) = self.links.get(id) {
            if let Err(err) = link
                .class_list()
                .toggle_with_force(&self.config.active_class, highlighted)
            {
                log::warn!("Failed to update highlight on '{}': {:?}", id, err);
            }
        }
    }

    fn hide_panel(&mut self) {
        if let Some(panel) = &self.panel {
            if let Err(err) = panel.set_attribute("hidden", "") {
                log::warn!("Failed to hide contents panel: {:?}", err);
            }
        }
        if let Some(layout) = &self.layout {
            if let Err(err) = layout.class_list().add_1(&self.config.single_column_class) {
                log::warn!("Failed to switch layout to a single column: {:?}", err);
            }
        }
    }

    fn current_fragment(&self) -> Option<String> {
        let hash = self.window.location().hash().ok()?;
        let fragment = fragment_from_hash(&hash)?;
        let decoded = js_sys::decode_uri_component(fragment)
            .map(String::from)
            .unwrap_or_else(|_| fragment.to_string());
        Some(decoded)
    }
}

struct Callbacks {
    // Owned here so the observer's callback outlives `connect`
    #[allow(dead_code)]
    intersect: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    click: Closure<dyn FnMut(MouseEvent)>,
    hash_change: Closure<dyn FnMut(Event)>,
    page_hide: Closure<dyn FnMut(PageTransitionEvent)>,
}

struct Runtime {
    toc: RefCell<MiniToc<DomHost>>,
    window: Window,
    list: Element,
    observer: RefCell<Option<IntersectionObserver>>,
    callbacks: RefCell<Option<Callbacks>>,
    torn_down: Cell<bool>,
}

impl Runtime {
    fn dispatch(&self, event: TocEvent) {
        if self.torn_down.get() {
            return;
        }
        match self.toc.try_borrow_mut() {
            Ok(mut toc) => toc.dispatch(event),
            Err(_) => log::debug!("Skipping re-entrant {:?}", event),
        }
    }

    fn schedule_refresh(weak: Weak<Runtime>, window: &Window) {
        let callback = Closure::once_into_js(move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.dispatch(TocEvent::Visibility);
            }
        });
        if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", err);
        }
    }

    fn connect(self: &Rc<Self>, config: &TocConfig) -> Result<(), JsValue> {
        let weak = Rc::downgrade(self);
        let intersect = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |_entries: js_sys::Array, _observer: IntersectionObserver| {
                if let Some(runtime) = weak.upgrade() {
                    runtime.dispatch(TocEvent::Visibility);
                }
            },
        );

        let weak = Rc::downgrade(self);
        let click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some(runtime) = weak.upgrade() else {
                return;
            };
            let target = resolve_link_target(&event);
            if target.is_none() {
                return;
            }
            runtime.dispatch(TocEvent::Click(target));
            Runtime::schedule_refresh(Rc::downgrade(&runtime), &runtime.window);
        });

        let weak = Rc::downgrade(self);
        let hash_change = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Some(runtime) = weak.upgrade() {
                let fragment = runtime.toc.borrow().host().current_fragment();
                runtime.dispatch(TocEvent::FragmentChanged(fragment));
            }
        });

        let weak = Rc::downgrade(self);
        let page_hide =
            Closure::<dyn FnMut(PageTransitionEvent)>::new(move |event: PageTransitionEvent| {
                if event.persisted() {
                    log::debug!("Page entering the back/forward cache, keeping panel");
                    return;
                }
                if let Some(runtime) = weak.upgrade() {
                    runtime.teardown();
                }
            });

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&config.observer.root_margin);
        let thresholds: js_sys::Array = config
            .observer
            .thresholds
            .iter()
            .map(|&threshold| JsValue::from_f64(threshold))
            .collect();
        options.set_threshold(&thresholds);

        let observer =
            IntersectionObserver::new_with_options(intersect.as_ref().unchecked_ref(), &options)?;
        {
            let toc = self.toc.borrow();
            for heading in toc.headings() {
                if let Some(element) = toc.host().targets.get(&heading.id) {
                    observer.observe(element);
                }
            }
        }

        self.list
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        self.window
            .add_event_listener_with_callback("hashchange", hash_change.as_ref().unchecked_ref())?;
        self.window
            .add_event_listener_with_callback("pagehide", page_hide.as_ref().unchecked_ref())?;

        *self.observer.borrow_mut() = Some(observer);
        *self.callbacks.borrow_mut() = Some(Callbacks {
            intersect,
            click,
            hash_change,
            page_hide,
        });
        Ok(())
    }

    /// Disconnect the observer and remove listeners; closures are freed with the runtime
    fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        if let Some(observer) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        if let Some(callbacks) = self.callbacks.borrow().as_ref() {
            let removed = [
                self.list.remove_event_listener_with_callback(
                    "click",
                    callbacks.click.as_ref().unchecked_ref(),
                ),
                self.window.remove_event_listener_with_callback(
                    "hashchange",
                    callbacks.hash_change.as_ref().unchecked_ref(),
                ),
                self.window.remove_event_listener_with_callback(
                    "pagehide",
                    callbacks.page_hide.as_ref().unchecked_ref(),
                ),
            ];
            for err in removed.into_iter().filter_map(Result::err) {
                log::warn!("Failed to remove listener: {:?}", err);
            }
        }
        log::debug!("Contents panel disconnected");
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Resolve the navigation link a click landed on, by capability: the
/// closest `<a>` whose `href` is a same-page fragment
fn resolve_link_target(event: &MouseEvent) -> Option<String> {
    let element = event.target()?.dyn_into::<Element>().ok()?;
    let link = element.closest("a").ok().flatten()?;
    let href = link.get_attribute("href")?;
    link_target(&href).map(str::to_string)
}

/// Handle to a mounted contents panel
#[wasm_bindgen]
pub struct MiniTocHandle {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl MiniTocHandle {
    /// Identifier of the highlighted heading
    #[wasm_bindgen(getter, js_name = activeId)]
    pub fn active_id(&self) -> Option<String> {
        self.runtime
            .toc
            .borrow()
            .list()
            .highlighted()
            .map(str::to_string)
    }

    /// Re-evaluate the active heading now
    pub fn refresh(&self) {
        self.runtime.dispatch(TocEvent::Visibility);
    }

    /// Disconnect the observer and remove every listener
    pub fn destroy(&self) {
        self.runtime.teardown();
    }
}

/// Build the contents panel on the current page
///
/// The panel lives as long as the returned handle; callers must keep it
/// reachable (e.g. `window.miniToc = mountMiniToc()`).
///
/// # Parameters
/// * `config` - Optional configuration object; `undefined` or `null` uses defaults
///
/// # Returns
/// * `Ok(Some(handle))` - Panel mounted
/// * `Ok(None)` - Page has no panel, or the document has no headings (panel hidden)
/// * `Err(error)` - Invalid configuration
#[wasm_bindgen(js_name = mountMiniToc)]
pub fn mount(config: JsValue) -> Result<Option<MiniTocHandle>, JsValue> {
    let config = parse_config(config)?;

    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let Some(document) = window.document() else {
        return Ok(None);
    };

    let host = DomHost::new(window.clone(), document, config.clone());
    let Some(list) = host.list.clone() else {
        log::debug!("No '{}' on this page, skipping", config.list_selector);
        return Ok(None);
    };

    let toc = match MiniToc::setup(host, &config) {
        Mount::Active(toc) => toc,
        Mount::Hidden | Mount::Absent => return Ok(None),
    };

    let runtime = Rc::new(Runtime {
        toc: RefCell::new(toc),
        window,
        list,
        observer: RefCell::new(None),
        callbacks: RefCell::new(None),
        torn_down: Cell::new(false),
    });
    runtime.connect(&config)?;

    Ok(Some(MiniTocHandle { runtime }))
}

fn parse_config(value: JsValue) -> Result<TocConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(TocConfig::default());
    }
    let config: TocConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|err| config_error(&format!("Invalid configuration object: {}", err)))?;
    config
        .validate()
        .map_err(|err: ConfigError| config_error(&err.to_string()))?;
    Ok(config)
}

fn config_error(message: &str) -> JsValue {
    let error = js_sys::Error::new(message);
    js_sys::Reflect::set(&error, &"code".into(), &JsValue::from_str("CONFIG_ERROR")).ok();
    error.into()
}
