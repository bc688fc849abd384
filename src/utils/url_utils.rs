//! URL helpers shared by the quality gate, the engine and discovery.

use std::collections::HashSet;
use url::Url;

/// Check if a URL is fetchable by this crate (absolute http/https)
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

/// Host of a URL, lowercased, with a leading `www.` removed
///
/// `www.example.com` and `example.com` compare equal so a canonicalizing
/// redirect is not mistaken for a redirect to a block page.
#[must_use]
pub fn normalized_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

/// Clean an untrusted candidate URL list
///
/// Trims entries, resolves relative ones against `base` (dropped when no base
/// is given), removes fragments, drops anything that is not absolute http(s),
/// and de-duplicates keeping the first occurrence.
#[must_use]
pub fn sanitize_candidate_urls(urls: &[String], base: Option<&Url>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    let mut cleaned = Vec::with_capacity(urls.len());

    for raw in urls {
        let candidate = raw.trim();
        if candidate.is_empty() {
            continue;
        }

        let parsed = match Url::parse(candidate) {
            Ok(u) => u,
            Err(url::ParseError::RelativeUrlWithoutBase) => match base {
                Some(b) => match b.join(candidate) {
                    Ok(u) => u,
                    Err(_) => continue,
                },
                None => continue,
            },
            Err(_) => continue,
        };

        let mut parsed = parsed;
        parsed.set_fragment(None);

        if !is_valid_url(parsed.as_str()) {
            continue;
        }

        let key = parsed.to_string();
        if seen.insert(key.clone()) {
            cleaned.push(key);
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("/relative/path"));
    }

    #[test]
    fn test_normalized_host_strips_www() {
        assert_eq!(normalized_host("https://www.Example.com/a"), Some("example.com".to_string()));
        assert_eq!(normalized_host("https://sub.example.com"), Some("sub.example.com".to_string()));
        assert_eq!(normalized_host("not a url"), None);
    }

    #[test]
    fn test_sanitize_resolves_dedupes_and_drops() {
        let base = Url::parse("https://example.com/search").ok();
        let input = vec![
            " https://a.com/page#section ".to_string(),
            "https://a.com/page".to_string(),
            "/docs".to_string(),
            "javascript:void(0)".to_string(),
            "http://[broken".to_string(),
            String::new(),
        ];

        let cleaned = sanitize_candidate_urls(&input, base.as_ref());
        assert_eq!(
            cleaned,
            vec!["https://a.com/page".to_string(), "https://example.com/docs".to_string()]
        );
    }

    #[test]
    fn test_sanitize_without_base_drops_relative() {
        let input = vec!["/docs".to_string(), "https://b.org".to_string()];
        assert_eq!(sanitize_candidate_urls(&input, None), vec!["https://b.org/".to_string()]);
    }
}
