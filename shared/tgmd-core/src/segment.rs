//! Segment, draft and video metadata records

use crate::ActionId;
use serde::{Deserialize, Serialize};

/// A saved, validated annotation spanning `[start_sec, end_sec)` for one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Opaque id, stable across edits
    pub id: String,

    pub action: ActionId,

    pub start_sec: f64,

    pub end_sec: f64,

    /// Ordinal among segments of the same action
    pub repetition_id: String,

    /// Identity supplied by the auth collaborator (None if anonymous)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotator_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Segment {
    /// Segment length in seconds
    pub fn duration(&self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// Candidate segment produced by the marking workflow, mutable until commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Set when the draft edits an existing segment
    #[serde(default)]
    pub id: Option<String>,

    pub action: ActionId,

    pub start_sec: f64,

    pub end_sec: f64,

    #[serde(default)]
    pub repetition_id: Option<String>,

    #[serde(default)]
    pub annotator_id: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Draft {
    /// Create a fresh draft for new bounds
    pub fn new(action: ActionId, start_sec: f64, end_sec: f64) -> Self {
        Self {
            id: None,
            action,
            start_sec,
            end_sec,
            repetition_id: None,
            annotator_id: None,
            notes: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_repetition(mut self, repetition_id: impl Into<String>) -> Self {
        self.repetition_id = Some(repetition_id.into());
        self
    }

    pub fn with_annotator(mut self, annotator_id: impl Into<String>) -> Self {
        self.annotator_id = Some(annotator_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Draft length in seconds, never negative
    pub fn duration(&self) -> f64 {
        let span = self.end_sec - self.start_sec;
        if span.is_finite() {
            span.max(0.0)
        } else {
            0.0
        }
    }
}

impl From<&Segment> for Draft {
    fn from(segment: &Segment) -> Self {
        Self {
            id: Some(segment.id.clone()),
            action: segment.action,
            start_sec: segment.start_sec,
            end_sec: segment.end_sec,
            repetition_id: Some(segment.repetition_id.clone()),
            annotator_id: segment.annotator_id.clone(),
            notes: segment.notes.clone(),
        }
    }
}

/// Metadata of the loaded source video, owned by the loading collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    pub file_name: String,

    /// Display identifier, exported verbatim
    pub file_path: String,

    /// Duration in seconds (0 until known)
    #[serde(default)]
    pub duration: f64,
}

impl VideoMeta {
    pub fn new(file_name: impl Into<String>, file_path: impl Into<String>, duration: f64) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: file_path.into(),
            duration,
        }
    }

    /// Metadata for a locally picked file, where the path shown is the file name
    pub fn from_file_name(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            file_path: file_name.clone(),
            file_name,
            duration: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_from_segment_keeps_identity() {
        let segment = Segment {
            id: "seg-1".to_string(),
            action: ActionId::Hop,
            start_sec: 2.0,
            end_sec: 4.5,
            repetition_id: "3".to_string(),
            annotator_id: Some("ana".to_string()),
            notes: None,
        };

        let draft = Draft::from(&segment);
        assert_eq!(draft.id.as_deref(), Some("seg-1"));
        assert_eq!(draft.repetition_id.as_deref(), Some("3"));
        assert_eq!(draft.duration(), 2.5);
        assert_eq!(segment.duration(), 2.5);
    }

    #[test]
    fn test_draft_duration_never_negative() {
        assert_eq!(Draft::new(ActionId::Run, 5.0, 3.0).duration(), 0.0);
        assert_eq!(Draft::new(ActionId::Run, f64::NAN, 3.0).duration(), 0.0);
    }

    #[test]
    fn test_video_meta_from_file_name() {
        let meta = VideoMeta::from_file_name("clip.mp4");
        assert_eq!(meta.file_name, "clip.mp4");
        assert_eq!(meta.file_path, "clip.mp4");
        assert_eq!(meta.duration, 0.0);
    }
}
