//! The transient dictionary from upstream string ids to locally assigned
//! ids, shared by C2 (bibliography), C4 (leaf content), and C5 (reference
//! markers) during one paper's pass. Destroyed with the pass; never shared
//! across papers (see §5 Concurrency & Resource Model).

use std::collections::HashMap;

use crate::model::ReferencedId;

pub type IdMap = HashMap<String, ReferencedId>;

/// Insert `original_id -> value`, but only if `original_id` is non-empty
/// and not already claimed. First occurrence wins: bibliography entries are
/// registered before content entries, so a colliding id always resolves to
/// the bibliography target.
pub fn register(map: &mut IdMap, original_id: Option<&str>, value: ReferencedId) {
    if let Some(id) = original_id {
        if !id.is_empty() {
            map.entry(id.to_string()).or_insert(value);
        }
    }
}

/// Unconditional insert used by the bibliography builder (C2), which runs
/// before any content id is registered and always wins ties among its own
/// entries by keeping the last one seen.
pub fn register_overwrite(map: &mut IdMap, original_id: Option<&str>, value: ReferencedId) {
    if let Some(id) = original_id {
        map.insert(id.to_string(), value);
    }
}
