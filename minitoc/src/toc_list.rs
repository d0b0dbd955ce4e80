//! Navigation list model: one entry per heading plus the id -> entry index

use crate::heading::Heading;
use std::collections::HashMap;

/// One row of the table-of-contents panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Heading level, used for the per-level class
    pub level: u8,
    /// Identifier of the target heading
    pub id: String,
    /// Link text, equal to the heading's display text
    pub text: String,
    /// Whether this entry is the active one
    pub highlighted: bool,
}

impl NavEntry {
    /// Link target of this entry (`#id`)
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

/// The navigation list and its link index
///
/// Entries are in document order. The index maps a heading identifier to
/// the position of its entry. At most one entry is highlighted at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocList {
    entries: Vec<NavEntry>,
    index: HashMap<String, usize>,
}

impl TocList {
    /// Build a list from collected headings
    pub fn from_headings(headings: &[Heading]) -> Self {
        let mut list = Self::default();
        list.build(headings);
        list
    }

    /// Clear and rebuild the list from `headings`
    ///
    /// Rebuilding with the same headings yields the same entries; the
    /// highlighted entry is kept when its heading still exists.
    pub fn build(&mut self, headings: &[Heading]) {
        let highlighted = self.highlighted().map(str::to_string);

        self.entries.clear();
        self.index.clear();

        for heading in headings {
            if self.index.contains_key(&heading.id) {
                log::warn!("Duplicate heading identifier '{}' ignored", heading.id);
                continue;
            }
            self.index.insert(heading.id.clone(), self.entries.len());
            self.entries.push(NavEntry {
                level: heading.level,
                id: heading.id.clone(),
                text: heading.text.clone(),
                highlighted: false,
            });
        }

        if let Some(id) = highlighted {
            self.highlight(&id);
        }
    }

    /// Highlight the entry for `id`, clearing every other entry
    ///
    /// # Returns
    /// * `Some(previous)` - `id` is known; `previous` is the formerly highlighted identifier, if any
    /// * `None` - `id` is unknown; nothing changed
    pub fn highlight(&mut self, id: &str) -> Option<Option<String>> {
        let position = *self.index.get(id)?;
        let previous = self.highlighted().map(str::to_string);

        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.highlighted = index == position;
        }

        Some(previous)
    }

    /// Identifier of the highlighted entry
    pub fn highlighted(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.highlighted)
            .map(|entry| entry.id.as_str())
    }

    /// Entry for a heading identifier
    pub fn get(&self, id: &str) -> Option<&NavEntry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// Whether `id` names an entry
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Entries in document order
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Identifiers in document order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
