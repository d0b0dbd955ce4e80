//! Markdown to HTML with heading identifiers assigned
//!
//! Headings are run through the same collector the browser uses, so a page
//! rendered here and mounted in the browser ends up with identical ids.

use minitoc::{collect_headings_with, Heading, HeadingNode, IdRegistry, TocConfig};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Rendered Markdown and the headings the contents panel will list
#[derive(Debug)]
pub struct RenderedDocument {
    /// HTML body of the document
    pub html: String,
    /// Collected headings in document order
    pub headings: Vec<Heading>,
}

/// A heading found in the event stream
struct MarkdownHeading {
    /// Position of the heading's start event
    event_index: usize,
    level: u8,
    text: String,
    /// `{#id}` attribute from the source
    explicit: Option<String>,
    /// Identifier chosen by the collector
    assigned: Option<String>,
}

impl HeadingNode for MarkdownHeading {
    fn level(&self) -> u8 {
        self.level
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn explicit_id(&self) -> Option<String> {
        self.explicit.clone()
    }

    fn assign_id(&mut self, id: &str) {
        self.assigned = Some(id.to_string());
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render Markdown, giving every in-scope heading a unique `id`
///
/// # Parameters
/// * `source` - Markdown text
/// * `config` - Decides which heading levels are in scope
///
/// # Returns
/// * `RenderedDocument` - The HTML and the collected headings
pub fn render_markdown(source: &str, config: &TocConfig) -> RenderedDocument {
    let mut events: Vec<Event> = Parser::new_ext(source, parser_options()).collect();

    let (mut nodes, out_of_scope) = scan_headings(&events, config);
    let mut registry = IdRegistry::new();
    for id in &out_of_scope {
        registry.reserve(id);
    }
    let headings = collect_headings_with(&mut nodes, registry, config);

    for node in &nodes {
        let Some(assigned) = &node.assigned else {
            continue;
        };
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[node.event_index] {
            *id = Some(CowStr::from(assigned.clone()));
        }
    }

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());

    RenderedDocument {
        html: output,
        headings,
    }
}

/// Find in-scope headings and their plain text
///
/// Also returns the `{#id}` attributes of out-of-scope headings, which
/// generated identifiers must not reuse.
fn scan_headings(events: &[Event], config: &TocConfig) -> (Vec<MarkdownHeading>, Vec<String>) {
    let mut headings = Vec::new();
    let mut out_of_scope = Vec::new();
    let mut current: Option<MarkdownHeading> = None;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some(MarkdownHeading {
                    event_index: index,
                    level: *level as u8,
                    text: String::new(),
                    explicit: id.as_ref().map(|id| id.to_string()),
                    assigned: None,
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    if config.in_scope(heading.level) {
                        headings.push(heading);
                    } else if let Some(id) = heading.explicit {
                        out_of_scope.push(id);
                    }
                }
            }
            _ => {}
        }
    }

    (headings, out_of_scope)
}
