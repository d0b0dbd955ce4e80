//! minitoc - table-of-contents panel for generated documentation pages
//!
//! Builds a navigation list from a rendered document's headings and keeps a
//! single "active" entry in sync with what the reader is looking at,
//! reconciling scroll position, link clicks and the URL fragment.
//!
//! # Module Structure
//!
//! - [`slug`] - Unique heading identifiers
//! - [`heading`] - Heading collection over any [`HeadingNode`] source
//! - [`toc_list`] - Navigation entries and the id -> entry index
//! - [`visibility`] - The visibility band and observer options
//! - [`tracker`] - The active-heading state machine
//! - [`panel`] - Component lifecycle over a [`PageHost`]
//! - [`render`] - Static list markup
//! - [`config`] - Shared configuration (minitoc.toml or a JS object)
//! - `dom` - Browser binding, compiled for `wasm32` only
//!
//! Everything except `dom` is target-agnostic, so the state machine can be
//! exercised natively with synthetic geometry.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod fragment;
pub mod heading;
pub mod panel;
pub mod render;
pub mod slug;
pub mod toc_list;
pub mod tracker;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use config::TocConfig;
pub use error::ConfigError;
pub use heading::{collect_headings, collect_headings_with, Heading, HeadingNode};
pub use panel::{MiniToc, Mount, PageHost, TocEvent};
pub use slug::IdRegistry;
pub use toc_list::{NavEntry, TocList};
pub use tracker::{Geometry, Mode, Tracker, TrackerState};
pub use visibility::{ObserverOptions, Rect, VisibilityBand};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// Installs the panic hook and, with the `console-logging` feature, routes
/// `log` records to the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
}
