//! In-memory segment store for the loaded video

use crate::{ActionId, Segment};
use tracing::debug;

/// Authoritative collection of saved segments, kept sorted by start time
#[derive(Debug, Clone, Default)]
pub struct SegmentStore {
    segments: Vec<Segment>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments ordered by `start_sec`; equal starts keep insertion order
    pub fn all(&self) -> &[Segment] {
        &self.segments
    }

    pub fn by_id(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id(id).is_some()
    }

    /// Replace the segment with the same id, or insert it, then re-sort.
    ///
    /// A replaced segment re-enters at the end of the insertion order, so it
    /// sorts after other segments sharing its start time. Only committed
    /// drafts come through here; `DraftEditor::commit` is the public way in.
    pub(crate) fn upsert(&mut self, segment: Segment) {
        debug_assert!(
            segment.end_sec > segment.start_sec,
            "segment end must exceed start"
        );
        let replaced = self.remove_by_id(&segment.id);
        debug!(
            "{} segment {} ({} {:.3}-{:.3})",
            if replaced { "Replaced" } else { "Inserted" },
            segment.id,
            segment.action,
            segment.start_sec,
            segment.end_sec
        );
        self.segments.push(segment);
        self.sort();
    }

    /// Remove a segment by id; returns whether anything was removed
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.remove_by_id(id);
        if removed {
            debug!("Deleted segment {}", id);
        }
        removed
    }

    /// Drop every segment (new video loaded)
    pub fn reset(&mut self) {
        self.segments.clear();
    }

    /// Number of segments annotated with `action`
    pub fn count_for(&self, action: ActionId) -> usize {
        self.segments.iter().filter(|s| s.action == action).count()
    }

    /// Segments of one action, in start-time order
    pub fn for_action(&self, action: ActionId) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(move |s| s.action == action)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.segments.len();
        self.segments.retain(|s| s.id != id);
        self.segments.len() != before
    }

    // `sort_by` is stable
    fn sort(&mut self) {
        self.segments.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: &str, action: ActionId, start: f64, end: f64) -> Segment {
        Segment {
            id: id.to_string(),
            action,
            start_sec: start,
            end_sec: end,
            repetition_id: "1".to_string(),
            annotator_id: None,
            notes: None,
        }
    }

    fn ids(store: &SegmentStore) -> Vec<&str> {
        store.all().iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_upsert_keeps_start_order() {
        let mut store = SegmentStore::new();
        store.upsert(segment("c", ActionId::Run, 9.0, 10.0));
        store.upsert(segment("a", ActionId::Hop, 1.0, 2.0));
        store.upsert(segment("b", ActionId::Kick, 4.0, 6.0));

        assert_eq!(ids(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = SegmentStore::new();
        store.upsert(segment("first", ActionId::Run, 3.0, 4.0));
        store.upsert(segment("second", ActionId::Hop, 3.0, 5.0));
        store.upsert(segment("early", ActionId::Kick, 1.0, 2.0));

        assert_eq!(ids(&store), vec!["early", "first", "second"]);

        // Re-saving "first" moves it behind "second" among equal starts
        store.upsert(segment("first", ActionId::Run, 3.0, 4.5));
        assert_eq!(ids(&store), vec!["early", "second", "first"]);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = SegmentStore::new();
        store.upsert(segment("x", ActionId::Run, 1.0, 2.0));
        store.upsert(segment("x", ActionId::Run, 5.0, 7.0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.by_id("x").unwrap().start_sec, 5.0);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = SegmentStore::new();
        store.upsert(segment("x", ActionId::Run, 1.0, 2.0));

        assert!(!store.delete("missing"));
        assert_eq!(store.len(), 1);
        assert!(store.delete("x"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_counts_and_reset() {
        let mut store = SegmentStore::new();
        store.upsert(segment("a", ActionId::Run, 1.0, 2.0));
        store.upsert(segment("b", ActionId::Run, 3.0, 4.0));
        store.upsert(segment("c", ActionId::Hop, 0.5, 4.0));

        assert_eq!(store.count_for(ActionId::Run), 2);
        assert_eq!(store.count_for(ActionId::Kick), 0);
        assert_eq!(store.for_action(ActionId::Run).count(), 2);

        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.count_for(ActionId::Run), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "segment end must exceed start")]
    fn test_upsert_rejects_inverted_bounds() {
        let mut store = SegmentStore::new();
        store.upsert(segment("bad", ActionId::Run, 4.0, 4.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "segment end must exceed start")]
    fn test_upsert_rejects_nan_bounds() {
        let mut store = SegmentStore::new();
        store.upsert(segment("bad", ActionId::Run, f64::NAN, 2.0));
    }

    #[test]
    fn test_overlap_is_allowed() {
        let mut store = SegmentStore::new();
        store.upsert(segment("a", ActionId::Run, 1.0, 5.0));
        store.upsert(segment("b", ActionId::Run, 2.0, 3.0));

        assert_eq!(store.len(), 2);
    }
}
