//! Shared key generation for storage backends.
//!
//! Key format: `videos/{unix_millis}-{random}-{sanitized_filename}`. The
//! timestamp-plus-random prefix keeps keys unique even when two uploads of
//! the same filename land in the same millisecond.

use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;

const RANDOM_SUFFIX_LEN: usize = 6;

/// Generate a storage key for an uploaded file.
///
/// All backends must use this format for consistency.
pub fn generate_storage_key(original_name: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!(
        "videos/{}-{}-{}",
        Utc::now().timestamp_millis(),
        suffix,
        sanitize_filename(original_name)
    )
}

/// Reduce a client-supplied filename to characters safe in storage keys.
///
/// Keeps ASCII alphanumerics plus `.`, `-` and `_`; everything else becomes
/// `_`. An empty or all-unsafe name falls back to `upload`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().all(|c| matches!(c, '.' | '_')) {
        "upload".to_string()
    } else {
        sanitized
    }
}
