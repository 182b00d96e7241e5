// src/page/mod.rs
// =============================================================================
// Everything that happens to a single page.
//
// Submodules:
// - html: raw HTML -> anchors and visible text (scraper)
// - links: anchors -> internal / external link records
// - processor: probe -> fetch -> extract -> sub-probe for one URL
// - types: the records passed between them and up to the scheduler
// =============================================================================

mod html;
mod links;
mod processor;
mod types;

pub use html::{extract_anchors, extract_visible_text};
pub use links::{extract_links, ExtractedLinks};
pub use processor::{process_page, ProcessOptions};
pub use types::{Anchor, BrokenLink, LinkFailure, LinkRecord, PageResult, PageStatus, NO_TEXT, UNKNOWN_SOURCE};
