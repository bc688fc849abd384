//! Default content extractor
//!
//! Scores container elements by the link-discounted text of the paragraph-like
//! blocks beneath them (full credit to the parent, half to the grandparent),
//! then renders the winning container's blocks as paragraphs. Boilerplate
//! elements and anything under them are ignored throughout.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::Extractor;

static BLOCK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, pre, blockquote, li, h1, h2, h3, h4, h5, h6, td, dd, figcaption")
        .expect("BUG: hardcoded CSS block selector is invalid")
});

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("BUG: hardcoded CSS selector 'a' is invalid")
});

static BOILERPLATE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)nav|menu|footer|sidebar|cookie|banner|share|comment|advert")
        .expect("BUG: hardcoded boilerplate pattern is invalid")
});

const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "footer", "header", "aside", "form", "iframe", "svg",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "pre", "blockquote", "li", "h1", "h2", "h3", "h4", "h5", "h6", "td", "dd", "figcaption",
];

/// Blocks that are mostly link text are navigation, not content
const MAX_LINK_DENSITY: f64 = 0.5;

/// Extraction below this many characters is reported as nothing
const MIN_OUTPUT_CHARS: usize = 25;

/// Precision-oriented extractor producing plain paragraphs
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityExtractor;

fn is_boilerplate(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if BOILERPLATE_TAGS.contains(&value.name()) {
        return true;
    }
    value.id().is_some_and(|id| BOILERPLATE_ATTR.is_match(id))
        || value.classes().any(|class| BOILERPLATE_ATTR.is_match(class))
}

fn under_boilerplate(element: ElementRef<'_>) -> bool {
    is_boilerplate(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(is_boilerplate)
}

fn normalized_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn link_density(element: ElementRef<'_>, text_len: usize) -> f64 {
    if text_len == 0 {
        return 1.0;
    }
    let link_chars: usize = element
        .select(&LINK_SELECTOR)
        .map(|a| normalized_text(a).chars().count())
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let density = link_chars as f64 / text_len as f64;
    density.min(1.0)
}

/// True if a block tag sits between `block` and `container`
fn nested_in_block(block: ElementRef<'_>, container: ElementRef<'_>) -> bool {
    block
        .ancestors()
        .take_while(|a| a.id() != container.id())
        .filter_map(ElementRef::wrap)
        .any(|a| BLOCK_TAGS.contains(&a.value().name()))
}

impl DensityExtractor {
    fn extract_text(document: &Html) -> Option<String> {
        let mut candidates: HashMap<_, (ElementRef<'_>, f64)> = HashMap::new();

        for block in document.select(&BLOCK_SELECTOR) {
            if under_boilerplate(block) {
                continue;
            }
            let text = normalized_text(block);
            let len = text.chars().count();
            let density = link_density(block, len);
            if len == 0 || density > MAX_LINK_DENSITY {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let score = len as f64 * (1.0 - density);

            let parent = block.parent().and_then(ElementRef::wrap);
            if let Some(parent) = parent {
                candidates.entry(parent.id()).or_insert((parent, 0.0)).1 += score;
                if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
                    candidates
                        .entry(grandparent.id())
                        .or_insert((grandparent, 0.0))
                        .1 += score / 2.0;
                }
            }
        }

        let (winner, _) = candidates
            .into_values()
            .max_by(|a, b| a.1.total_cmp(&b.1))?;

        let paragraphs: Vec<String> = winner
            .select(&BLOCK_SELECTOR)
            .filter(|block| !under_boilerplate(*block) && !nested_in_block(*block, winner))
            .filter(|block| {
                let len = normalized_text(*block).chars().count();
                len > 0 && link_density(*block, len) <= MAX_LINK_DENSITY
            })
            .map(normalized_text)
            .collect();

        let text = paragraphs.join("\n\n");
        (text.chars().count() >= MIN_OUTPUT_CHARS).then_some(text)
    }
}

impl Extractor for DensityExtractor {
    fn extract(&self, html: &str, _base_url: Option<&str>) -> Option<String> {
        if html.trim().is_empty() {
            return None;
        }
        let document = Html::parse_document(html);
        Self::extract_text(&document)
    }
}
