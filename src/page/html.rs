// src/page/html.rs
// =============================================================================
// This module turns raw HTML into the two things the rest of the crate needs:
// - the ordered list of anchors (href + visible text) for link extraction
// - the visible text of the page for keyword analysis
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Nothing here touches the network or resolves URLs; hrefs are returned
// exactly as written in the markup.
//
// Rust concepts:
// - Iterators: For walking the element tree
// - Closures: Anonymous functions (|x| ...)
// - let-else: bail out early when a selector cannot be built
// =============================================================================

use super::types::Anchor;
use scraper::{Html, Node, Selector};

// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

// Extracts every <a href> from HTML content, in document order
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: Vec<Anchor> with the raw href and collapsed visible text
//
// Example:
//   html = "<a href='/docs'>Read   the docs</a>"
//   result = [Anchor { href: "/docs", text: "Read the docs" }]
pub fn extract_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);

    // "a[href]" means "all <a> tags that have an href attribute"
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            let text = collapse_whitespace(element.text());
            Some(Anchor::new(href, text))
        })
        .collect()
}

// Extracts the text a reader would see: the contents of <body> without
// script, style, noscript or template subtrees.
//
// Falls back to the whole document when there is no <body> element.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let chunks = root.descendants().filter_map(|node| {
        let Node::Text(text) = node.value() else {
            return None;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            None
        } else {
            Some(&**text)
        }
    });

    collapse_whitespace(chunks)
}

// Joins text fragments and squeezes every run of whitespace into one space
fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for fragment in fragments {
        for word in fragment.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }
    out
}
