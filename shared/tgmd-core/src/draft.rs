//! Draft validation and commit

use crate::{
    next_repetition, ActionCatalog, ActionId, AnnotationError, Draft, IdGenerator, Result, Segment,
    SegmentStore,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum number of id draws before giving up on a colliding generator
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Validates in-flight drafts and writes them into a [`SegmentStore`]
pub struct DraftEditor {
    catalog: Arc<ActionCatalog>,
    ids: Box<dyn IdGenerator>,
}

impl fmt::Debug for DraftEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftEditor")
            .field("catalog_len", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl DraftEditor {
    pub fn new(catalog: Arc<ActionCatalog>, ids: Box<dyn IdGenerator>) -> Self {
        Self { catalog, ids }
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Check a draft; the first failing rule wins.
    ///
    /// Rules in order: action is in the catalog, end exceeds start, both
    /// bounds are finite and non-negative.
    pub fn validate(&self, draft: &Draft) -> Result<()> {
        if self.catalog.by_id(draft.action).is_none() {
            return Err(AnnotationError::UnknownAction(draft.action.to_string()));
        }

        if !(draft.end_sec > draft.start_sec) {
            return Err(AnnotationError::Ordering {
                start: draft.start_sec,
                end: draft.end_sec,
            });
        }

        for value in [draft.start_sec, draft.end_sec] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnnotationError::Range(value));
            }
        }

        Ok(())
    }

    /// Open a saved segment for editing
    pub fn open(&self, segment: &Segment) -> Draft {
        Draft::from(segment)
    }

    /// Move a draft to another action and renumber its repetition
    pub fn retarget(&self, draft: &mut Draft, action: ActionId, store: &SegmentStore) -> Result<()> {
        if self.catalog.by_id(action).is_none() {
            return Err(AnnotationError::UnknownAction(action.to_string()));
        }

        draft.action = action;
        draft.repetition_id = Some(next_repetition(action, store));
        Ok(())
    }

    /// Validate `draft` and write it into `store`, replacing any segment with the same id.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn commit(&mut self, draft: &Draft, store: &mut SegmentStore) -> Result<Segment> {
        self.validate(draft)?;

        let id = match non_blank(draft.id.as_deref()) {
            Some(id) => id,
            None => self.unique_id(store)?,
        };

        let repetition_id = non_blank(draft.repetition_id.as_deref())
            .unwrap_or_else(|| next_repetition(draft.action, store));

        let segment = Segment {
            id,
            action: draft.action,
            start_sec: draft.start_sec,
            end_sec: draft.end_sec,
            repetition_id,
            annotator_id: non_blank(draft.annotator_id.as_deref()),
            notes: non_blank(draft.notes.as_deref()),
        };

        store.upsert(segment.clone());
        debug!(
            "Committed segment {} ({} #{})",
            segment.id, segment.action, segment.repetition_id
        );
        Ok(segment)
    }

    fn unique_id(&mut self, store: &SegmentStore) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !id.trim().is_empty() && !store.contains(&id) {
                return Ok(id);
            }
            warn!("Generated segment id collided with an existing segment, retrying");
        }

        Err(AnnotationError::IdCollision(MAX_ID_ATTEMPTS))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
