//! HTML-to-text extraction
//!
//! Every strategy level goes through the `Extractor` seam. Extractors must
//! not fail the retrieval: `safe_extract` turns a panic or blank output into
//! `None`.

pub mod density;
pub mod structured;

use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

pub use density::DensityExtractor;
pub use structured::{StructuredText, structured_extract, structured_text};

/// Given raw HTML and an optional base URL, return cleaned text or nothing
pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str, base_url: Option<&str>) -> Option<String>;
}

/// Run `extractor`, treating a panic or whitespace-only output as `None`
pub fn safe_extract(extractor: &dyn Extractor, html: &str, base_url: Option<&str>) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(html, base_url))) {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(_) => {
            warn!(
                "Extractor panicked on {}; treating output as empty",
                base_url.unwrap_or("<no base url>")
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panicking;

    impl Extractor for Panicking {
        fn extract(&self, _html: &str, _base_url: Option<&str>) -> Option<String> {
            panic!("extractor bug");
        }
    }

    struct Blank;

    impl Extractor for Blank {
        fn extract(&self, _html: &str, _base_url: Option<&str>) -> Option<String> {
            Some("  \n ".to_string())
        }
    }

    #[test]
    fn test_panicking_extractor_is_empty() {
        assert_eq!(safe_extract(&Panicking, "<p>x</p>", None), None);
    }

    #[test]
    fn test_blank_output_is_empty() {
        assert_eq!(safe_extract(&Blank, "<p>x</p>", Some("https://example.com")), None);
    }
}
