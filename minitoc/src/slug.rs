//! Stable, unique DOM identifiers for headings

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Identifier used when a heading's text has no alphanumeric characters
pub const FALLBACK_SLUG: &str = "section";

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("valid slug pattern"))
}

/// Turn heading text into a URL-fragment friendly slug
///
/// Lower-cases and trims the text, collapses every run of whitespace or
/// non-alphanumeric characters into a single `-` and strips hyphens at
/// either end. Returns [`FALLBACK_SLUG`] when nothing is left.
///
/// # Examples
/// "Getting Started!" -> "getting-started", "  --  " -> "section"
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let slug = separator_pattern().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Set of identifiers already in use within a document
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    reserved: HashSet<String>,
}

impl IdRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an explicit identifier verbatim
    ///
    /// # Returns
    /// * `true` - The identifier was free and is now reserved
    /// * `false` - The identifier was already reserved
    pub fn reserve(&mut self, id: &str) -> bool {
        self.reserved.insert(id.to_string())
    }

    /// Whether `id` is already taken
    pub fn is_reserved(&self, id: &str) -> bool {
        self.reserved.contains(id)
    }

    /// Derive a unique identifier from heading text and reserve it
    ///
    /// Collisions are resolved by appending `-2`, `-3`, ... to the slug.
    pub fn assign(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();
        let mut suffix = 2;

        while self.reserved.contains(&candidate) {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        self.reserved.insert(candidate.clone());
        candidate
    }
}
