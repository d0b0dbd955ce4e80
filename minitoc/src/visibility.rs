//! Visibility band used to decide which headings count as "in view"
//!
//! The band runs from just below the fixed page header down to near the
//! bottom of the viewport. A heading is visible when any part of it falls
//! inside the band. The intersection observer options live here too, but the
//! observer is only a trigger: [`VisibilityBand::contains`] is the source of
//! truth for both pin retention and scoring.

use serde::{Deserialize, Serialize};

/// Vertical extent of an element in viewport coordinates (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top edge, relative to the viewport top
    pub top: f64,
    /// Bottom edge, relative to the viewport top
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its top and bottom edges
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    fn is_finite(&self) -> bool {
        self.top.is_finite() && self.bottom.is_finite()
    }
}

/// Geometry of the "interesting" vertical band of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityBand {
    /// Height of the fixed header; headings whose bottom edge is above this are hidden behind it
    pub header_offset_px: f64,

    /// Headings whose top edge is below this fraction of the viewport are not yet in view
    pub bottom_ratio: f64,

    /// Fraction of the viewport height where the scoring target line sits
    pub target_ratio: f64,
}

impl Default for VisibilityBand {
    fn default() -> Self {
        Self {
            header_offset_px: 80.0,
            bottom_ratio: 0.9,
            target_ratio: 0.35,
        }
    }
}

impl VisibilityBand {
    /// Whether any part of `rect` intersects the band
    ///
    /// # Parameters
    /// * `rect` - Bounding rectangle of the heading
    /// * `viewport_height` - Current viewport height
    ///
    /// # Returns
    /// * `true` - The heading's top is above `bottom_ratio` of the viewport and
    ///   its bottom is below the header offset
    /// * `false` - Otherwise, including for non-finite geometry
    pub fn contains(&self, rect: Rect, viewport_height: f64) -> bool {
        rect.is_finite()
            && rect.top < viewport_height * self.bottom_ratio
            && rect.bottom > self.header_offset_px
    }

    /// Y coordinate of the target line headings are scored against
    pub fn target_line(&self, viewport_height: f64) -> f64 {
        viewport_height * self.target_ratio
    }

    /// Score a heading: the closer its top edge is to the target line, the higher
    pub fn score(&self, rect: Rect, viewport_height: f64) -> f64 {
        -(rect.top - self.target_line(viewport_height)).abs()
    }
}

/// Options handed to the viewport intersection observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// CSS margin applied to the viewport root, biasing the trigger area towards the top
    pub root_margin: String,

    /// Intersection ratios at which the observer reports a change
    pub thresholds: Vec<f64>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: "-10% 0px -70% 0px".to_string(),
            thresholds: vec![0.0, 1.0],
        }
    }
}
