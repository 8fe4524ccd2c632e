//! Pagination defaults and clamping helpers for list endpoints.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the API layer and the repositories.

/// Default number of rows per list page.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of rows per list page.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Clamp a caller-supplied limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(l) if l < 1 => default,
        Some(l) => l.min(max),
        None => default,
    }
}

/// Clamp a caller-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
