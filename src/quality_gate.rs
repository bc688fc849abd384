//! Content quality gate
//!
//! Pure acceptance checks applied after every strategy level. Nothing here
//! performs I/O; the engine decides what to do with the verdicts.
//!
//! Two bars exist:
//! - words, strictly more than `min_words` (structured extraction)
//! - stripped characters, strictly more than `min_chars` (browser render)

use tracing::debug;

use crate::utils::normalized_host;

/// Whitespace-delimited token count
#[inline]
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True iff `text` is non-empty after trimming and has more than `min_words` words
#[must_use]
pub fn is_acceptable(text: &str, min_words: usize) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && word_count(trimmed) > min_words
}

/// Post-render bar: more than `min_chars` characters once trimmed
#[must_use]
pub fn meets_render_bar(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() > min_chars
}

/// Detect a bot challenge in rendered markup or a redirect off the requested host
///
/// Returns true if `raw_markup` contains any of `markers` (case-insensitive),
/// or if the host of `final_url` differs from the host of `requested_url`.
/// A leading `www.` is ignored on both sides. An unparseable final URL counts
/// as a mismatch; an unparseable requested URL disables the host check.
#[must_use]
pub fn looks_bot_blocked(
    raw_markup: &str,
    final_url: &str,
    requested_url: &str,
    markers: &[String],
) -> bool {
    let lowered = raw_markup.to_lowercase();
    if let Some(marker) = markers
        .iter()
        .find(|m| !m.is_empty() && lowered.contains(&m.to_lowercase()))
    {
        debug!("Bot challenge marker '{}' found in markup", marker);
        return true;
    }

    let Some(requested_host) = normalized_host(requested_url) else {
        return false;
    };

    match normalized_host(final_url) {
        Some(final_host) if final_host == requested_host => false,
        Some(final_host) => {
            debug!(
                "Navigation left requested host: {} -> {}",
                requested_host, final_host
            );
            true
        }
        None => true,
    }
}
