//! Two-phase start/end marking state machine

use crate::{next_repetition, ActionId, AnnotationError, Draft, Result, SegmentStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pending marks for the segment being captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkingState {
    pub pending_start: Option<f64>,
    pub pending_end: Option<f64>,
}

/// Where the controller is in the marking cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkingPhase {
    /// No pending marks
    Idle,

    /// Start marked, waiting for an end sample
    StartMarked,

    /// Both marks set, a draft has been emitted
    EndMarked,
}

/// Turns playback-time samples into drafts
#[derive(Debug, Clone, Default)]
pub struct MarkingController {
    state: MarkingState,
}

impl MarkingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MarkingState {
        self.state
    }

    pub fn phase(&self) -> MarkingPhase {
        match (self.state.pending_start, self.state.pending_end) {
            (None, _) => MarkingPhase::Idle,
            (Some(_), None) => MarkingPhase::StartMarked,
            (Some(_), Some(_)) => MarkingPhase::EndMarked,
        }
    }

    /// Mark the segment start, discarding any earlier pending marks
    pub fn mark_start(&mut self, selected: Option<ActionId>, at: f64) -> Result<()> {
        if selected.is_none() {
            return Err(AnnotationError::NoActionSelected);
        }

        self.state = MarkingState {
            pending_start: Some(at),
            pending_end: None,
        };
        debug!("Start marked at {:.3}s", at);
        Ok(())
    }

    /// Mark the segment end and emit a draft for the selected action.
    ///
    /// On any failure the pending marks are left untouched.
    pub fn mark_end(
        &mut self,
        selected: Option<ActionId>,
        at: f64,
        store: &SegmentStore,
        annotator: Option<&str>,
    ) -> Result<Draft> {
        let action = selected.ok_or(AnnotationError::NoActionSelected)?;
        let start = self.state.pending_start.ok_or(AnnotationError::NoStart)?;

        // NaN never exceeds the start
        if !(at > start) {
            return Err(AnnotationError::Ordering { start, end: at });
        }

        self.state.pending_end = Some(at);
        debug!("End marked at {:.3}s", at);

        let mut draft = Draft::new(action, start, at).with_repetition(next_repetition(action, store));
        draft.annotator_id = annotator.map(str::to_string);
        Ok(draft)
    }

    /// Seed both marks from an existing segment being edited
    pub fn resume(&mut self, start: f64, end: f64) {
        self.state = MarkingState {
            pending_start: Some(start),
            pending_end: Some(end),
        };
    }

    /// Return to idle after the emitted draft was committed or abandoned
    pub fn reset(&mut self) {
        self.state = MarkingState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Segment;

    const RUN: Option<ActionId> = Some(ActionId::Run);

    #[test]
    fn test_mark_cycle_emits_draft() {
        let store = SegmentStore::new();
        let mut controller = MarkingController::new();

        controller.mark_start(RUN, 1.5).unwrap();
        assert_eq!(controller.phase(), MarkingPhase::StartMarked);

        let draft = controller.mark_end(RUN, 3.25, &store, Some("ana")).unwrap();
        assert_eq!(controller.phase(), MarkingPhase::EndMarked);
        assert_eq!(draft.action, ActionId::Run);
        assert_eq!(draft.start_sec, 1.5);
        assert_eq!(draft.end_sec, 3.25);
        assert_eq!(draft.repetition_id.as_deref(), Some("1"));
        assert_eq!(draft.annotator_id.as_deref(), Some("ana"));
        assert!(draft.id.is_none());
    }

    #[test]
    fn test_repetition_follows_store_count() {
        let mut store = SegmentStore::new();
        store.upsert(Segment {
            id: "a".to_string(),
            action: ActionId::Run,
            start_sec: 0.0,
            end_sec: 1.0,
            repetition_id: "1".to_string(),
            annotator_id: None,
            notes: None,
        });

        let mut controller = MarkingController::new();
        controller.mark_start(RUN, 2.0).unwrap();
        let draft = controller.mark_end(RUN, 3.0, &store, None).unwrap();
        assert_eq!(draft.repetition_id.as_deref(), Some("2"));
        assert!(draft.annotator_id.is_none());
    }

    #[test]
    fn test_end_not_after_start_is_rejected() {
        let store = SegmentStore::new();
        let mut controller = MarkingController::new();
        controller.mark_start(RUN, 5.0).unwrap();

        for end in [5.0, 4.0, f64::NAN] {
            let err = controller.mark_end(RUN, end, &store, None).unwrap_err();
            assert!(matches!(err, AnnotationError::Ordering { .. }));
            assert_eq!(err.to_string(), "end must exceed start");
        }

        assert_eq!(controller.state().pending_start, Some(5.0));
        assert_eq!(controller.state().pending_end, None);
        assert_eq!(controller.phase(), MarkingPhase::StartMarked);
    }

    #[test]
    fn test_end_without_start() {
        let store = SegmentStore::new();
        let mut controller = MarkingController::new();

        let err = controller.mark_end(RUN, 2.0, &store, None).unwrap_err();
        assert!(matches!(err, AnnotationError::NoStart));
        assert_eq!(controller.phase(), MarkingPhase::Idle);
    }

    #[test]
    fn test_no_selection_checked_first() {
        let store = SegmentStore::new();
        let mut controller = MarkingController::new();

        assert!(matches!(
            controller.mark_start(None, 1.0),
            Err(AnnotationError::NoActionSelected)
        ));
        // Idle and no selection: selection error wins over NoStart
        assert!(matches!(
            controller.mark_end(None, 2.0, &store, None),
            Err(AnnotationError::NoActionSelected)
        ));
        assert_eq!(controller.phase(), MarkingPhase::Idle);
    }

    #[test]
    fn test_remark_start_discards_previous_marks() {
        let store = SegmentStore::new();
        let mut controller = MarkingController::new();

        controller.mark_start(RUN, 1.0).unwrap();
        controller.mark_end(RUN, 2.0, &store, None).unwrap();
        controller.mark_start(RUN, 8.0).unwrap();

        assert_eq!(
            controller.state(),
            MarkingState {
                pending_start: Some(8.0),
                pending_end: None
            }
        );
    }

    #[test]
    fn test_resume_and_reset() {
        let mut controller = MarkingController::new();
        controller.resume(2.0, 4.0);
        assert_eq!(controller.phase(), MarkingPhase::EndMarked);

        controller.reset();
        assert_eq!(controller.phase(), MarkingPhase::Idle);
        assert_eq!(controller.state(), MarkingState::default());
    }
}
