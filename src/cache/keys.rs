//! Cache key definitions.

const MANGA_PREFIX: &str = "manga:";

/// Key under which the snapshot of a single manga (with chapters) is stored.
pub fn manga_key(name: &str) -> String {
    let mut key = String::with_capacity(MANGA_PREFIX.len() + name.len());
    key.push_str(MANGA_PREFIX);
    key.push_str(name);
    key
}
