//! Static HTML for the navigation list
//!
//! Produces the same markup the browser binding builds element by element,
//! so a page can ship with the list prerendered.

use crate::config::TocConfig;
use crate::toc_list::{NavEntry, TocList};

/// Render every entry of `list` as `<li>` markup
pub fn render_items(list: &TocList, config: &TocConfig) -> String {
    let mut output = String::new();
    for entry in list.entries() {
        write_item(&mut output, entry, config);
    }
    output
}

/// Class attribute value for a list item
pub fn item_classes(entry: &NavEntry, config: &TocConfig) -> String {
    format!("{} {}", config.item_class, config.level_class(entry.level))
}

/// Class attribute value for a link
pub fn link_classes(entry: &NavEntry, config: &TocConfig) -> String {
    if entry.highlighted {
        format!("{} {}", config.link_class, config.active_class)
    } else {
        config.link_class.clone()
    }
}

fn write_item(output: &mut String, entry: &NavEntry, config: &TocConfig) {
    output.push_str(&format!(
        "<li class=\"{}\"><a class=\"{}\" href=\"{}\">{}</a></li>\n",
        escape_html(&item_classes(entry, config)),
        escape_html(&link_classes(entry, config)),
        escape_html(&entry.href()),
        escape_html(&entry.text)
    ));
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
