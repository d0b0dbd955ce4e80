//! Heading collection and identifier assignment
//!
//! Headings come from whatever renders the document: live DOM elements in
//! the browser, parsed Markdown headings in the CLI. Both implement
//! [`HeadingNode`] so a single collector decides what is in scope, how
//! levels are normalised and which identifiers are written back.

use crate::config::TocConfig;
use crate::slug::IdRegistry;
use std::collections::HashSet;

/// A heading element as seen by the collector
pub trait HeadingNode {
    /// Raw heading level (2 for `<h2>`)
    fn level(&self) -> u8;

    /// Display text, untrimmed
    fn text(&self) -> String;

    /// Identifier already present on the element, if any
    fn explicit_id(&self) -> Option<String>;

    /// Write the chosen identifier back onto the element
    fn assign_id(&mut self, id: &str);
}

/// A collected, in-scope heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, clamped to the configured range
    pub level: u8,
    /// Trimmed display text, never empty
    pub text: String,
    /// Identifier unique within the document
    pub id: String,
}

/// Collect headings in document order and give each a unique identifier
///
/// Headings whose trimmed text is empty are excluded entirely. Explicit
/// identifiers are authoritative and are reserved before any slug is
/// generated, including those on headings that are themselves excluded. A
/// heading repeating an explicit identifier already used by an earlier
/// heading is skipped, since only the first one can be a fragment target.
///
/// # Parameters
/// * `nodes` - Candidate headings in document order
/// * `config` - Supplies the level clamp range
///
/// # Returns
/// * `Vec<Heading>` - Possibly empty; an empty result means the panel should be hidden
pub fn collect_headings<N: HeadingNode>(nodes: &mut [N], config: &TocConfig) -> Vec<Heading> {
    collect_headings_with(nodes, IdRegistry::new(), config)
}

/// Like [`collect_headings`], with identifiers used elsewhere in the
/// document already reserved in `registry`
pub fn collect_headings_with<N: HeadingNode>(
    nodes: &mut [N],
    mut registry: IdRegistry,
    config: &TocConfig,
) -> Vec<Heading> {
    for node in nodes.iter() {
        if let Some(id) = node.explicit_id().filter(|id| !id.is_empty()) {
            registry.reserve(&id);
        }
    }

    let candidates: Vec<(usize, String, Option<String>)> = nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let text = node.text().trim().to_string();
            if text.is_empty() {
                return None;
            }
            let explicit = node.explicit_id().filter(|id| !id.is_empty());
            Some((index, text, explicit))
        })
        .collect();

    let mut seen_explicit = HashSet::new();
    let mut headings = Vec::with_capacity(candidates.len());

    for (index, text, explicit) in candidates {
        let node = &mut nodes[index];
        let id = match explicit {
            Some(id) => {
                if !seen_explicit.insert(id.clone()) {
                    log::warn!(
                        "Skipping heading '{}': identifier '{}' is already used by an earlier heading",
                        text,
                        id
                    );
                    continue;
                }
                id
            }
            None => {
                let id = registry.assign(&text);
                node.assign_id(&id);
                id
            }
        };

        headings.push(Heading {
            level: config.clamp_level(node.level()),
            text,
            id,
        });
    }

    log::debug!("Collected {} headings", headings.len());
    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHeading {
        level: u8,
        text: &'static str,
        id: Option<String>,
    }

    impl FakeHeading {
        fn new(level: u8, text: &'static str) -> Self {
            Self {
                level,
                text,
                id: None,
            }
        }

        fn with_id(level: u8, text: &'static str, id: &str) -> Self {
            Self {
                level,
                text,
                id: Some(id.to_string()),
            }
        }
    }

    impl HeadingNode for FakeHeading {
        fn level(&self) -> u8 {
            self.level
        }

        fn text(&self) -> String {
            self.text.to_string()
        }

        fn explicit_id(&self) -> Option<String> {
            self.id.clone()
        }

        fn assign_id(&mut self, id: &str) {
            self.id = Some(id.to_string());
        }
    }

    #[test]
    fn test_collect_skips_empty_headings() {
        let mut nodes = vec![
            FakeHeading::new(2, "Intro"),
            FakeHeading::new(2, "   "),
            FakeHeading::new(3, "Details"),
        ];

        let headings = collect_headings(&mut nodes, &TocConfig::default());

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Intro");
        assert_eq!(headings[1].text, "Details");
        // The empty heading is left untouched
        assert_eq!(nodes[1].id, None);
    }

    #[test]
    fn test_collect_assigns_unique_ids() {
        let mut nodes = vec![
            FakeHeading::new(2, "Overview"),
            FakeHeading::new(3, "Overview"),
            FakeHeading::new(2, " Usage "),
        ];

        let headings = collect_headings(&mut nodes, &TocConfig::default());
        let ids: Vec<&str> = headings.iter().map(|h| h.id.as_str()).collect();

        assert_eq!(ids, vec!["overview", "overview-2", "usage"]);
        assert_eq!(nodes[1].id.as_deref(), Some("overview-2"));
        assert_eq!(headings[2].text, "Usage");
    }

    #[test]
    fn test_collect_keeps_explicit_ids() {
        let mut nodes = vec![
            FakeHeading::new(2, "Install"),
            FakeHeading::with_id(2, "Setup", "install"),
        ];

        let headings = collect_headings(&mut nodes, &TocConfig::default());

        // The later explicit id wins its own name; the slug moves aside
        assert_eq!(headings[0].id, "install-2");
        assert_eq!(headings[1].id, "install");
    }

    #[test]
    fn test_collect_blank_explicit_id_is_reassigned() {
        let mut nodes = vec![FakeHeading::with_id(2, "Scope", "")];

        let headings = collect_headings(&mut nodes, &TocConfig::default());

        assert_eq!(headings[0].id, "scope");
        assert_eq!(nodes[0].id.as_deref(), Some("scope"));
    }

    #[test]
    fn test_collect_skips_duplicate_explicit_ids() {
        let mut nodes = vec![
            FakeHeading::with_id(2, "First", "dup"),
            FakeHeading::with_id(2, "Second", "dup"),
            FakeHeading::new(2, "Third"),
        ];

        let headings = collect_headings(&mut nodes, &TocConfig::default());
        let texts: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();

        assert_eq!(texts, vec!["First", "Third"]);
    }

    #[test]
    fn test_collect_reserves_ids_of_empty_headings() {
        let mut nodes = vec![
            FakeHeading::with_id(2, "  ", "intro"),
            FakeHeading::new(2, "Intro"),
        ];

        let headings = collect_headings(&mut nodes, &TocConfig::default());

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].id, "intro-2");
        assert_eq!(nodes[0].id.as_deref(), Some("intro"));
        assert_eq!(nodes[1].id.as_deref(), Some("intro-2"));
    }

    #[test]
    fn test_collect_with_seeded_registry() {
        let mut registry = IdRegistry::new();
        registry.reserve("usage");
        let mut nodes = vec![FakeHeading::new(2, "Usage")];

        let headings = collect_headings_with(&mut nodes, registry, &TocConfig::default());

        assert_eq!(headings[0].id, "usage-2");
    }

    #[test]
    fn test_collect_clamps_levels() {
        let mut nodes = vec![FakeHeading::new(1, "Top"), FakeHeading::new(6, "Deep")];

        let headings = collect_headings(&mut nodes, &TocConfig::default());

        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[1].level, 4);
    }

    #[test]
    fn test_collect_empty_document() {
        let mut nodes: Vec<FakeHeading> = Vec::new();
        assert!(collect_headings(&mut nodes, &TocConfig::default()).is_empty());
    }
}
