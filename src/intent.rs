//! Abstract user intents and replay scripts

use serde::{Deserialize, Serialize};
use std::path::Path;
use tgmd_core::VideoMeta;

/// Partial update applied to the open draft from the annotation form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftPatch {
    #[serde(default)]
    pub start_sec: Option<f64>,

    #[serde(default)]
    pub end_sec: Option<f64>,

    #[serde(default)]
    pub annotator_id: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl DraftPatch {
    pub fn is_empty(&self) -> bool {
        self.start_sec.is_none()
            && self.end_sec.is_none()
            && self.annotator_id.is_none()
            && self.notes.is_none()
    }
}

/// Everything the input layer can ask of a session.
///
/// The first six mirror the keyboard layer; the rest come from the
/// surrounding UI (video picker, segment list, annotation form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    TogglePlay,
    MarkStart,
    MarkEnd,
    SaveSegment,
    Jump {
        delta: f64,
    },
    /// `None` clears the selection
    SelectAction {
        #[serde(default)]
        id: Option<String>,
    },
    LoadVideo {
        file_name: String,
        #[serde(default)]
        file_path: Option<String>,
        #[serde(default)]
        duration: f64,
    },
    Seek {
        time: f64,
    },
    UpdateDraft(DraftPatch),
    CancelDraft,
    EditSegment {
        id: String,
    },
    DeleteSegment {
        id: String,
    },
    /// Remove the most recently saved segment
    UndoLastSave,
    Export,
}

impl Intent {
    /// Video metadata carried by a `LoadVideo` intent
    pub fn video_meta(&self) -> Option<VideoMeta> {
        match self {
            Intent::LoadVideo {
                file_name,
                file_path,
                duration,
            } => Some(VideoMeta::new(
                file_name.clone(),
                file_path.clone().unwrap_or_else(|| file_name.clone()),
                *duration,
            )),
            _ => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Intent::TogglePlay => "toggle_play",
            Intent::MarkStart => "mark_start",
            Intent::MarkEnd => "mark_end",
            Intent::SaveSegment => "save_segment",
            Intent::Jump { .. } => "jump",
            Intent::SelectAction { .. } => "select_action",
            Intent::LoadVideo { .. } => "load_video",
            Intent::Seek { .. } => "seek",
            Intent::UpdateDraft(_) => "update_draft",
            Intent::CancelDraft => "cancel_draft",
            Intent::EditSegment { .. } => "edit_segment",
            Intent::DeleteSegment { .. } => "delete_segment",
            Intent::UndoLastSave => "undo_last_save",
            Intent::Export => "export",
        }
    }
}

/// Script loading failures
#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid intent script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a JSON array of intents
pub fn parse_script(json: &str) -> Result<Vec<Intent>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON intent script from disk
pub async fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<Intent>, ScriptError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let intents = parse_script(&content)?;
    tracing::debug!("📜 Loaded {} intents from {}", intents.len(), path.as_ref().display());
    Ok(intents)
}
