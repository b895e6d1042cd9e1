//! Annotation session: the single owner of engine state for one annotator

use crate::intent::{DraftPatch, Intent};
use crate::playback::{PlaybackControl, TimeSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tgmd_core::{
    format_time, ActionCatalog, ActionId, AnnotationError, CsvExport, Draft, DraftEditor,
    IdGenerator, MarkingController, MarkingPhase, MarkingState, Result, Segment, SegmentStore,
    VideoMeta,
};
use tracing::{debug, info};

/// Identity handed over by the auth collaborator, treated as opaque
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatorIdentity {
    pub identity: String,
}

impl AnnotatorIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

/// Outcome of a successful session operation; `Display` gives the status line
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    VideoLoaded { file_name: String },
    PlaybackToggled { playing: bool },
    Seeked { time: f64 },
    ActionSelected { action: Option<ActionId> },
    StartMarked { at: f64 },
    EndMarked { draft: Draft },
    DraftUpdated { draft: Draft },
    DraftCancelled,
    SegmentSaved { segment: Segment },
    SegmentOpened { draft: Draft },
    SegmentDeleted { id: String, removed: bool },
    SaveUndone { segment: Option<Segment> },
    Exported(CsvExport),
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::VideoLoaded { file_name } => write!(f, "Loaded video {}", file_name),
            SessionEvent::PlaybackToggled { playing } => {
                write!(f, "{}", if *playing { "Playing" } else { "Paused" })
            }
            SessionEvent::Seeked { time } => write!(f, "At {}", format_time(*time)),
            SessionEvent::ActionSelected { action: Some(action) } => {
                write!(f, "Selected action {}", action)
            }
            SessionEvent::ActionSelected { action: None } => write!(f, "Selection cleared"),
            SessionEvent::StartMarked { at } => write!(f, "Start marked at {}", format_time(*at)),
            SessionEvent::EndMarked { draft } => write!(
                f,
                "End marked at {}. Complete the form.",
                format_time(draft.end_sec)
            ),
            SessionEvent::DraftUpdated { draft } => write!(
                f,
                "Draft {} {} - {}",
                draft.action,
                format_time(draft.start_sec),
                format_time(draft.end_sec)
            ),
            SessionEvent::DraftCancelled => write!(f, "Draft discarded"),
            SessionEvent::SegmentSaved { segment } => write!(
                f,
                "Segment saved: {} {} - {}",
                segment.action,
                format_time(segment.start_sec),
                format_time(segment.end_sec)
            ),
            SessionEvent::SegmentOpened { draft } => write!(
                f,
                "Editing {} {} - {}",
                draft.action,
                format_time(draft.start_sec),
                format_time(draft.end_sec)
            ),
            SessionEvent::SegmentDeleted { removed: true, .. } => write!(f, "Segment deleted."),
            SessionEvent::SegmentDeleted { removed: false, id } => {
                write!(f, "No segment {} to delete", id)
            }
            SessionEvent::SaveUndone { segment: Some(_) } => write!(f, "Last segment undone."),
            SessionEvent::SaveUndone { segment: None } => write!(f, "Nothing to undo"),
            SessionEvent::Exported(export) => {
                write!(f, "Exported {} rows to {}", export.rows, export.file_name)
            }
        }
    }
}

/// Marking, drafting and storage for the currently loaded video
#[derive(Debug)]
pub struct AnnotationSession {
    catalog: Arc<ActionCatalog>,
    store: SegmentStore,
    marking: MarkingController,
    editor: DraftEditor,
    draft: Option<Draft>,
    selected_action: Option<ActionId>,
    current_user: Option<AnnotatorIdentity>,
    video: Option<VideoMeta>,
    last_saved: Option<Segment>,
}

impl AnnotationSession {
    pub fn new(catalog: Arc<ActionCatalog>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            editor: DraftEditor::new(Arc::clone(&catalog), ids),
            catalog,
            store: SegmentStore::new(),
            marking: MarkingController::new(),
            draft: None,
            selected_action: None,
            current_user: None,
            video: None,
            last_saved: None,
        }
    }

    pub fn with_user(mut self, user: Option<AnnotatorIdentity>) -> Self {
        self.current_user = user;
        self
    }

    pub fn set_current_user(&mut self, user: Option<AnnotatorIdentity>) {
        self.current_user = user;
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn current_user(&self) -> Option<&AnnotatorIdentity> {
        self.current_user.as_ref()
    }

    pub fn video(&self) -> Option<&VideoMeta> {
        self.video.as_ref()
    }

    /// Saved segments in start-time order
    pub fn segments(&self) -> &[Segment] {
        self.store.all()
    }

    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    pub fn marking_state(&self) -> MarkingState {
        self.marking.state()
    }

    pub fn phase(&self) -> MarkingPhase {
        self.marking.phase()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn selected_action(&self) -> Option<ActionId> {
        self.selected_action
    }

    pub fn last_saved(&self) -> Option<&Segment> {
        self.last_saved.as_ref()
    }

    /// Switch to a new video, dropping every segment, mark and draft of the previous one
    pub fn load_video(&mut self, meta: VideoMeta) {
        self.store.reset();
        self.marking.reset();
        self.draft = None;
        self.last_saved = None;
        info!("🎬 Loaded video {} ({:.2}s)", meta.file_name, meta.duration);
        self.video = Some(meta);
    }

    /// Select an action by raw id, or clear the selection with `None`.
    ///
    /// Clearing discards the open draft; a new selection retargets it.
    pub fn select_action(&mut self, raw: Option<&str>) -> Result<Option<ActionId>> {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            self.selected_action = None;
            self.draft = None;
            return Ok(None);
        };

        let action = self
            .catalog
            .resolve(raw)
            .map(|a| a.id)
            .ok_or_else(|| AnnotationError::UnknownAction(raw.to_string()))?;

        if let Some(draft) = self.draft.as_mut() {
            self.editor.retarget(draft, action, &self.store)?;
        }
        self.selected_action = Some(action);
        debug!("Selected action {}", action);
        Ok(Some(action))
    }

    /// Mark the start at the current playback position
    pub fn mark_start(&mut self, time: &dyn TimeSource) -> Result<f64> {
        let at = time.current_time();
        self.marking.mark_start(self.selected_action, at)?;
        self.draft = None;
        Ok(at)
    }

    /// Mark the end at the current playback position and open the resulting draft
    pub fn mark_end(&mut self, time: &dyn TimeSource) -> Result<&Draft> {
        let annotator = self.current_user.as_ref().map(|u| u.identity.as_str());
        let draft = self
            .marking
            .mark_end(self.selected_action, time.current_time(), &self.store, annotator)?;
        Ok(&*self.draft.insert(draft))
    }

    /// Apply form edits to the open draft; bounds are checked on save
    pub fn update_draft(&mut self, patch: DraftPatch) -> Result<&Draft> {
        let draft = self.draft.as_mut().ok_or(AnnotationError::NoDraft)?;

        if let Some(start) = patch.start_sec {
            draft.start_sec = start;
        }
        if let Some(end) = patch.end_sec {
            draft.end_sec = end;
        }
        // A logged-in annotator's identity is locked
        if let (Some(annotator), None) = (patch.annotator_id, self.current_user.as_ref()) {
            draft.annotator_id = Some(annotator);
        }
        if let Some(notes) = patch.notes {
            draft.notes = Some(notes);
        }

        Ok(&*draft)
    }

    /// Commit the open draft; on failure the draft and store are left as they were
    pub fn save_draft(&mut self) -> Result<Segment> {
        let draft = self.draft.as_ref().ok_or(AnnotationError::NoDraft)?;
        let segment = match self.current_user.as_ref() {
            Some(user) => {
                let mut stamped = draft.clone();
                stamped.annotator_id = Some(user.identity.clone());
                self.editor.commit(&stamped, &mut self.store)?
            }
            None => self.editor.commit(draft, &mut self.store)?,
        };

        self.draft = None;
        self.marking.reset();
        self.selected_action = None;
        self.last_saved = Some(segment.clone());
        info!(
            "💾 Saved {} #{} ({} segments)",
            segment.action,
            segment.repetition_id,
            self.store.len()
        );
        Ok(segment)
    }

    /// Abandon the open draft and pending marks without touching the store
    pub fn cancel_draft(&mut self) -> bool {
        self.marking.reset();
        self.draft.take().is_some()
    }

    /// Open a saved segment as a draft carrying its id
    pub fn edit_segment(&mut self, id: &str) -> Result<&Draft> {
        let segment = self
            .store
            .by_id(id)
            .ok_or_else(|| AnnotationError::UnknownSegment(id.to_string()))?;

        let draft = self.editor.open(segment);
        self.marking.resume(draft.start_sec, draft.end_sec);
        self.selected_action = Some(draft.action);
        Ok(&*self.draft.insert(draft))
    }

    /// Delete a saved segment; missing ids are ignored
    pub fn delete_segment(&mut self, id: &str) -> bool {
        let removed = self.store.delete(id);
        if removed {
            info!("🗑️ Deleted segment ({} remaining)", self.store.len());
        }
        removed
    }

    /// Remove the most recently saved segment, edits included.
    ///
    /// Returns the removed segment, or `None` when there is nothing to undo.
    pub fn undo_last_save(&mut self) -> Result<Option<Segment>> {
        let Some(segment) = self.last_saved.take() else {
            return Ok(None);
        };

        if !self.store.delete(&segment.id) {
            return Ok(None);
        }
        info!("↩️ Undid last save ({} segments)", self.store.len());
        Ok(Some(segment))
    }

    /// A video is loaded and at least one segment is saved
    pub fn can_export(&self) -> bool {
        self.video.is_some() && !self.store.is_empty()
    }

    /// Render the saved segments of the loaded video
    pub fn export(&self) -> Result<CsvExport> {
        let meta = self.video.as_ref().ok_or(AnnotationError::NoVideoLoaded)?;
        Ok(CsvExport::new(self.store.all(), meta))
    }

    /// Apply one intent, driving `player` for playback-related intents
    pub fn dispatch<P: PlaybackControl>(&mut self, intent: Intent, player: &mut P) -> Result<SessionEvent> {
        debug!("Dispatching {}", intent.name());

        match intent {
            Intent::TogglePlay => Ok(SessionEvent::PlaybackToggled {
                playing: player.toggle_play(),
            }),
            Intent::Jump { delta } => Ok(SessionEvent::Seeked {
                time: player.jump(delta),
            }),
            Intent::Seek { time } => {
                player.seek(time);
                Ok(SessionEvent::Seeked {
                    time: player.current_time(),
                })
            }
            Intent::MarkStart => {
                let at = self.mark_start(&*player)?;
                Ok(SessionEvent::StartMarked { at })
            }
            Intent::MarkEnd => {
                let draft = self.mark_end(&*player)?.clone();
                Ok(SessionEvent::EndMarked { draft })
            }
            Intent::SaveSegment => {
                let segment = self.save_draft()?;
                // Stay on the end of the saved segment
                player.seek(segment.end_sec);
                Ok(SessionEvent::SegmentSaved { segment })
            }
            Intent::SelectAction { id } => {
                let action = self.select_action(id.as_deref())?;
                Ok(SessionEvent::ActionSelected { action })
            }
            intent @ Intent::LoadVideo { .. } => {
                let meta = intent.video_meta().ok_or(AnnotationError::NoVideoLoaded)?;
                let file_name = meta.file_name.clone();
                player.load(meta.duration);
                self.load_video(meta);
                Ok(SessionEvent::VideoLoaded { file_name })
            }
            Intent::UpdateDraft(patch) => {
                let draft = self.update_draft(patch)?.clone();
                Ok(SessionEvent::DraftUpdated { draft })
            }
            Intent::CancelDraft => {
                self.cancel_draft();
                Ok(SessionEvent::DraftCancelled)
            }
            Intent::EditSegment { id } => {
                let draft = self.edit_segment(&id)?.clone();
                player.seek(draft.start_sec);
                Ok(SessionEvent::SegmentOpened { draft })
            }
            Intent::DeleteSegment { id } => {
                let removed = self.delete_segment(&id);
                Ok(SessionEvent::SegmentDeleted { id, removed })
            }
            Intent::UndoLastSave => Ok(SessionEvent::SaveUndone {
                segment: self.undo_last_save()?,
            }),
            Intent::Export => Ok(SessionEvent::Exported(self.export()?)),
        }
    }
}
