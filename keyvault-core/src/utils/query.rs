use std::cmp::Reverse;

use crate::types::ApiKey;

/// Case-insensitive substring match against name, organization and description.
///
/// Absent optional fields never match. An empty query matches every record.
#[must_use]
pub fn matches_query(api_key: &ApiKey, query: &str) -> bool {
    let needle = query.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    hit(&api_key.name)
        || api_key.organization.as_deref().is_some_and(hit)
        || api_key.description.as_deref().is_some_and(hit)
}

/// Sorts by `updated_at` descending, newest insertion (`id`) first on ties.
pub fn sort_newest_first(keys: &mut [ApiKey]) {
    keys.sort_by_key(|k| Reverse((k.updated_at, k.id)));
}
