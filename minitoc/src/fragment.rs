//! URL fragment handling and link target resolution

/// Extract the fragment identifier from a `location.hash` style string
///
/// Returns `None` for an empty hash or a bare `#`.
pub fn fragment_from_hash(hash: &str) -> Option<&str> {
    let fragment = hash.strip_prefix('#').unwrap_or(hash);
    (!fragment.is_empty()).then_some(fragment)
}

/// Resolve the heading a navigation link points at
///
/// Only same-page fragment links (`#id`) are usable; anything else
/// (external URLs, other pages, a bare `#`) yields `None` and is left to
/// the browser's default handling.
pub fn link_target(href: &str) -> Option<&str> {
    href.trim()
        .strip_prefix('#')
        .filter(|target| !target.is_empty())
}
