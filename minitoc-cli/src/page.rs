//! HTML page shell around a rendered document
//!
//! Emits the layout the browser component expects: the document inside the
//! content region and the contents panel beside it, with the list already
//! filled in. A document without headings gets the panel hidden and the
//! layout switched to a single column, exactly as the runtime would do.

use crate::markdown::RenderedDocument;
use minitoc::render::{escape_html, render_items};
use minitoc::{TocConfig, TocList};

/// Options for a rendered page
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Page title
    pub title: String,
    /// URL of the browser module that mounts the panel
    pub script_url: Option<String>,
}

/// Build a complete HTML page for `doc`
pub fn render_page(doc: &RenderedDocument, config: &TocConfig, options: &PageOptions) -> String {
    let mut output = String::new();
    write_html_header(&mut output, &options.title);

    output.push_str("<body>\n");

    let list = TocList::from_headings(&doc.headings);
    let has_panel = !list.is_empty();

    let layout_class = class_of(&config.layout_selector, "doc-layout");
    if has_panel {
        output.push_str(&format!("<div class=\"{}\">\n", escape_html(&layout_class)));
    } else {
        output.push_str(&format!(
            "<div class=\"{} {}\">\n",
            escape_html(&layout_class),
            escape_html(&config.single_column_class)
        ));
    }

    output.push_str(&format!(
        "<article class=\"{}\">\n",
        escape_html(&class_of(&config.content_selector, "doc-content"))
    ));
    output.push_str(&doc.html);
    output.push_str("</article>\n");

    let hidden = if has_panel { "" } else { " hidden" };
    output.push_str(&format!(
        "<nav class=\"{}\" aria-label=\"Contents\"{}>\n",
        escape_html(&class_of(&config.panel_selector, "mini-toc")),
        hidden
    ));
    output.push_str("<div class=\"mini-toc__title\">Contents</div>\n");
    output.push_str(&format!(
        "<ol class=\"{}\">\n",
        escape_html(&class_of(&config.list_selector, "mini-toc__list"))
    ));
    output.push_str(&render_items(&list, config));
    output.push_str("</ol>\n");
    output.push_str("</nav>\n");
    output.push_str("</div>\n");

    if let Some(url) = &options.script_url {
        write_mount_script(&mut output, url);
    }

    output.push_str("</body>\n");
    output.push_str("</html>\n");
    output
}

/// Class name a simple `tag.class` / `.class` selector refers to
///
/// Falls back to `default` for selectors that are not a single class.
fn class_of(selector: &str, default: &str) -> String {
    selector
        .rsplit_once('.')
        .map(|(_, class)| class)
        .filter(|class| {
            !class.is_empty()
                && class
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .unwrap_or(default)
        .to_string()
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

fn write_mount_script(output: &mut String, url: &str) {
    output.push_str("<script type=\"module\">\n");
    output.push_str(&format!(
        "import init, {{ mountMiniToc }} from \"{}\";\n",
        escape_html(url)
    ));
    output.push_str("await init();\n");
    // The panel lives as long as its handle
    output.push_str("window.miniToc = mountMiniToc();\n");
    output.push_str("</script>\n");
}

/// Two-column layout with a sticky contents panel
const CSS_STYLES: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
    line-height: 1.6;
    color: #333;
    margin: 0;
    padding: 80px 20px 20px;
}

.doc-layout {
    display: grid;
    grid-template-columns: minmax(0, 1fr) 240px;
    gap: 40px;
    max-width: 1200px;
    margin: 0 auto;
}

.doc-layout--single {
    grid-template-columns: minmax(0, 1fr);
}

.doc-content h2,
.doc-content h3,
.doc-content h4 {
    scroll-margin-top: 80px;
}

.mini-toc {
    position: sticky;
    top: 80px;
    align-self: start;
    max-height: calc(100vh - 100px);
    overflow-y: auto;
    font-size: 0.9em;
}

.mini-toc[hidden] {
    display: none;
}

.mini-toc__title {
    font-weight: 600;
    text-transform: uppercase;
    letter-spacing: 0.05em;
    margin-bottom: 8px;
}

.mini-toc__list {
    list-style: none;
    margin: 0;
    padding: 0;
}

.mini-toc__item--level-3 {
    padding-left: 12px;
}

.mini-toc__item--level-4 {
    padding-left: 24px;
}

.mini-toc__link {
    display: block;
    padding: 2px 8px;
    color: #555;
    text-decoration: none;
    border-left: 2px solid transparent;
}

.mini-toc__link.is-active {
    color: #0066cc;
    border-left-color: #0066cc;
}

@media screen and (max-width: 768px) {
    .doc-layout {
        grid-template-columns: minmax(0, 1fr);
    }

    .mini-toc {
        display: none;
    }
}
"#;
