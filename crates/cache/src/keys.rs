//! Cache key generators for consistent key naming.

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "courier";

/// Key holding the serialized preference snapshot for a user.
#[must_use]
pub fn user_preferences(user_id: i64) -> String {
    format!("{}:prefs:user:{}", CACHE_PREFIX, user_id)
}
