//! API constants.

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Lifetime of the streaming URL attached to list responses and the share page.
pub const STREAM_URL_TTL_SECS: u64 = 3600;

/// Lifetime of the shareable URL attached to list responses.
pub const SHARE_URL_TTL_SECS: u64 = 86400;

/// The share page reloads itself shortly before its embedded streaming URL
/// expires (3_500_000 ms < 3600 s).
pub const SHARE_PAGE_REFRESH_MS: u64 = 3_500_000;
