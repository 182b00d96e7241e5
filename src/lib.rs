// src/lib.rs
// =============================================================================
// The crawlscope library: everything except argument parsing and printing.
//
// - crawl: bounded, batch-at-a-time crawl of one website
// - keywords: word and phrase ranking for any page
// - page / fetch / canonical: the building blocks both of them share
//
// The binary in main.rs is a thin layer over these modules.
// =============================================================================

pub mod canonical;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod keywords;
pub mod page;
