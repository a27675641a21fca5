//! # Upload Filenames
//!
//! Stored image names are generated, never taken verbatim from the client:
//!
//! ```text
//! "My Lamp (1).PNG"  ──prefix──►  "3fa9_20240101T120000_My Lamp (1).PNG"
//!                    ──secure_filename──►  "3fa9_20240101T120000_My_Lamp_1.PNG"
//!                                           ▲    ▲                ▲
//!                                           │    │                └ original, sanitized
//!                                           │    └ UTC timestamp
//!                                           └ 4 hex chars of a v4 UUID
//! ```
//!
//! The whole composed name is sanitized at once, so an original whose stem
//! is entirely non-ASCII (`"日本.png"`) still keeps its extension.
//!
//! Writing the bytes is the web app's job; this module only decides names.

use std::path::{Component, Path};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Name used when sanitizing leaves nothing behind.
pub const FALLBACK_FILENAME: &str = "upload";

/// Reduces a client-supplied filename to a safe single path component.
///
/// ## Rules
/// - Non-ASCII characters are dropped
/// - `/` and `\` become spaces; whitespace runs become one `_`
/// - Only `[A-Za-z0-9_.-]` survive
/// - Leading and trailing `.` / `_` are stripped
/// - An empty result becomes [`FALLBACK_FILENAME`]
///
/// ```rust
/// use bazaar_core::upload::secure_filename;
///
/// assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
/// assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
/// ```
pub fn secure_filename(original: &str) -> String {
    let spaced: String = original
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Four lowercase hex characters from a fresh v4 UUID.
pub fn random_token() -> String {
    Uuid::new_v4().simple().to_string()[..4].to_string()
}

/// `secure_filename("{token}_{YYYYMMDDThhmmss}_{original}")`.
pub fn generate_upload_filename(original: &str, now: DateTime<Utc>, token: &str) -> String {
    secure_filename(&format!(
        "{}_{}_{}",
        token,
        now.format("%Y%m%dT%H%M%S"),
        original
    ))
}

/// Whether a requested name is exactly one normal path component.
///
/// Used before serving from the uploads directory.
pub fn is_safe_stored_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
