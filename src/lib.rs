/// TGMD Annotator - Rust Implementation
///
/// Segment annotation engine for TGMD-3 motor-skill videos: marking,
/// drafting, editing and CSV export driven by abstract user intents.

pub mod config;
pub mod intent;
pub mod keys;
pub mod playback;
pub mod session;
pub mod replay;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::intent::{DraftPatch, Intent};
pub use crate::keys::KeyBindings;
pub use crate::playback::{ManualClock, PlaybackControl, TimeSource};
pub use crate::session::{AnnotationSession, AnnotatorIdentity, SessionEvent};
pub use crate::replay::{Replay, ReplayReport};
pub use tgmd_core::{ActionCatalog, ActionId, AnnotationError, CsvExport, Segment, VideoMeta};
