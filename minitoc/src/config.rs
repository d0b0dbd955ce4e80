//! Table-of-contents configuration from minitoc.toml
//!
//! Every constant the panel relies on (selectors, class names, heading range,
//! visibility band, observer options) lives here so that the page host and
//! the browser runtime agree on one set of values.

use crate::error::ConfigError;
use crate::visibility::{ObserverOptions, VisibilityBand};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the table-of-contents panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Selector of the main content region headings are collected from
    pub content_selector: String,

    /// Selector of the list element the navigation entries are written into
    pub list_selector: String,

    /// Selector of the panel hidden when the document has no headings
    pub panel_selector: String,

    /// Selector of the two-column layout wrapper
    pub layout_selector: String,

    /// Class added to the layout wrapper when the panel is hidden
    pub single_column_class: String,

    /// Lowest heading level collected (and lower clamp bound)
    pub min_level: u8,

    /// Highest heading level collected (and upper clamp bound)
    pub max_level: u8,

    /// Explicit heading selector, overriding the one derived from the level range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_selector: Option<String>,

    /// Class on every list item
    pub item_class: String,

    /// Prefix of the per-level class on list items (`prefix` + level)
    pub level_class_prefix: String,

    /// Class on every navigation link
    pub link_class: String,

    /// Class marking the highlighted link
    pub active_class: String,

    /// Visibility band geometry
    pub band: VisibilityBand,

    /// Intersection observer options
    pub observer: ObserverOptions,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            content_selector: "article.doc-content".to_string(),
            list_selector: "ol.mini-toc__list".to_string(),
            panel_selector: "nav.mini-toc".to_string(),
            layout_selector: ".doc-layout".to_string(),
            single_column_class: "doc-layout--single".to_string(),
            min_level: 2,
            max_level: 4,
            heading_selector: None,
            item_class: "mini-toc__item".to_string(),
            level_class_prefix: "mini-toc__item--level-".to_string(),
            link_class: "mini-toc__link".to_string(),
            active_class: "is-active".to_string(),
            band: VisibilityBand::default(),
            observer: ObserverOptions::default(),
        }
    }
}

impl TocConfig {
    /// Load configuration from a minitoc.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(TocConfig)` - Successfully loaded and validated configuration
    /// * `Err(ConfigError)` - Error reading, parsing or validating the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TocConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a minitoc.toml file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Check that the configuration describes a usable panel
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_level < 1 || self.max_level > 6 || self.min_level > self.max_level {
            return Err(ConfigError::InvalidLevels {
                min: self.min_level,
                max: self.max_level,
            });
        }

        let ratios = [
            ("band.bottom_ratio", self.band.bottom_ratio),
            ("band.target_ratio", self.band.target_ratio),
        ];
        for (field, value) in ratios {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidRatio { field, value });
            }
        }

        let offset = self.band.header_offset_px;
        if !offset.is_finite() || offset < 0.0 {
            return Err(ConfigError::InvalidOffset(offset));
        }

        let required = [
            ("content_selector", &self.content_selector),
            ("list_selector", &self.list_selector),
            ("panel_selector", &self.panel_selector),
            ("layout_selector", &self.layout_selector),
            ("single_column_class", &self.single_column_class),
            ("item_class", &self.item_class),
            ("link_class", &self.link_class),
            ("active_class", &self.active_class),
        ];
        if let Some(&(field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::EmptyField(field));
        }
        if matches!(&self.heading_selector, Some(selector) if selector.trim().is_empty()) {
            return Err(ConfigError::EmptyField("heading_selector"));
        }

        if self.observer.thresholds.is_empty() {
            return Err(ConfigError::EmptyField("observer.thresholds"));
        }
        if let Some(bad) = self
            .observer
            .thresholds
            .iter()
            .find(|t| !(0.0..=1.0).contains(*t))
        {
            return Err(ConfigError::InvalidThreshold(*bad));
        }

        Ok(())
    }

    /// Selector matching in-scope headings inside the content region
    ///
    /// Uses the explicit `heading_selector` when set, otherwise `h2, h3, h4`
    /// style from the configured level range.
    pub fn heading_selector(&self) -> String {
        match &self.heading_selector {
            Some(selector) => selector.clone(),
            None => (self.min_level..=self.max_level)
                .map(|level| format!("h{}", level))
                .join(", "),
        }
    }

    /// Whether a heading of `level` is collected
    pub fn in_scope(&self, level: u8) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }

    /// Clamp a heading level into the configured range
    pub fn clamp_level(&self, level: u8) -> u8 {
        level.clamp(self.min_level, self.max_level)
    }

    /// Per-level class for a list item, e.g. `mini-toc__item--level-3`
    pub fn level_class(&self, level: u8) -> String {
        format!("{}{}", self.level_class_prefix, level)
    }
}
