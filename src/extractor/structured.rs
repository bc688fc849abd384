//! Structured extraction: main-region text with an extractor override

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use super::{Extractor, safe_extract};
use crate::quality_gate::word_count;

/// Tried in order; the first match is the content region
static REGION_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["main", "article", ".content", ".post", "#content"]
        .iter()
        .map(|s| {
            Selector::parse(s).unwrap_or_else(|_| panic!("BUG: hardcoded CSS selector '{s}' is invalid"))
        })
        .collect()
});

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

/// Elements whose text never reaches the baseline
const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer"];

/// Level 2 output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredText {
    pub text: String,
    pub word_count: usize,
    /// True when the extractor's output replaced the baseline
    pub from_extractor: bool,
}

fn is_stripped(element: ElementRef<'_>) -> bool {
    STRIPPED_TAGS.contains(&element.value().name())
}

/// Text of `region`, one trimmed text node per line, skipping stripped subtrees
fn region_text(region: ElementRef<'_>) -> String {
    let region_id = region.id();
    let mut lines = Vec::new();

    for node in region.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_stripped = node
            .ancestors()
            .take_while(|a| a.id() != region_id)
            .filter_map(ElementRef::wrap)
            .any(is_stripped);
        if inside_stripped {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}

/// True if `element` sits inside a stripped subtree
fn has_stripped_ancestor(element: ElementRef<'_>) -> bool {
    element.ancestors().filter_map(ElementRef::wrap).any(is_stripped)
}

/// Baseline text from the main content region
///
/// Stripped subtrees are removed before region matching, so a region nested in
/// `<nav>` or `<footer>` never matches. Falls back to `<body>`, then the whole
/// document, when no region matches.
#[must_use]
pub fn structured_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let region = REGION_SELECTORS
        .iter()
        .find_map(|selector| {
            document
                .select(selector)
                .find(|el| !is_stripped(*el) && !has_stripped_ancestor(*el))
        })
        .or_else(|| document.select(&BODY_SELECTOR).next())
        .unwrap_or_else(|| document.root_element());

    region_text(region)
}

/// Baseline text, replaced by the extractor's output when that is non-empty
///
/// The extractor always sees the original markup.
#[must_use]
pub fn structured_extract(
    html: &str,
    base_url: Option<&str>,
    extractor: &dyn Extractor,
) -> StructuredText {
    let (text, from_extractor) = match safe_extract(extractor, html, base_url) {
        Some(extracted) => (extracted, true),
        None => (structured_text(html), false),
    };

    let words = word_count(&text);
    debug!(
        "Structured extraction produced {} words (extractor: {})",
        words, from_extractor
    );

    StructuredText {
        text,
        word_count: words,
        from_extractor,
    }
}
