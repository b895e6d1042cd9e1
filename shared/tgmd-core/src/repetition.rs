//! Repetition ordinal assignment

use crate::{ActionId, SegmentStore};

/// Next repetition ordinal for `action`: one more than the segments currently stored for it.
///
/// Counts are taken from live store contents, so deleting a segment can make
/// a later segment reuse an ordinal already handed out.
pub fn next_repetition(action: ActionId, store: &SegmentStore) -> String {
    (store.count_for(action) + 1).to_string()
}
