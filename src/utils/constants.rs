//! Shared configuration constants for resilient fetching
//!
//! Defaults used by `FetchConfig` and the strategy levels.

use std::time::Duration;

/// Desktop Chrome user agent sent by both the HTTP transport and the browser
///
/// Keep in step with current stable: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Default attempts per HTTP retrieval
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default total timeout for one HTTP attempt (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Unit of the linear retry backoff: attempt `i` sleeps `(i + 1) * unit`
pub const DEFAULT_RETRY_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Structured extraction must produce strictly more words than this
pub const DEFAULT_MIN_WORDS: usize = 100;

/// Rendered text must have strictly more stripped characters than this
pub const DEFAULT_MIN_RENDER_CHARS: usize = 50;

/// Default admission gate width for batches
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Markers that identify a bot challenge page (matched case-insensitively)
pub const DEFAULT_BOT_MARKERS: &[&str] = &["captcha"];

/// Desktop viewport used by every browser context
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Idle connections kept per host by the HTTP pool
pub const POOL_MAX_IDLE_PER_HOST: usize = 20;

/// Idle pooled connections are dropped after this long
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Text returned by an interactive session is truncated to this many chars
pub const SESSION_TEXT_LIMIT: usize = 2000;

/// Navigation preview returned by an interactive session
pub const SESSION_PREVIEW_LIMIT: usize = 500;
