//! TGMD Core - Annotation segment lifecycle for TGMD-3 motor-skill videos

pub mod catalog;
pub mod segment;
pub mod store;
pub mod repetition;
pub mod marking;
pub mod draft;
pub mod ids;
pub mod export;
pub mod time;

pub use catalog::{ActionCatalog, ActionDefinition, ActionId};
pub use segment::{Draft, Segment, VideoMeta};
pub use store::SegmentStore;
pub use repetition::next_repetition;
pub use marking::{MarkingController, MarkingPhase, MarkingState};
pub use draft::DraftEditor;
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use export::{CsvExport, CSV_MIME_TYPE};
pub use time::format_time;

/// Result type for TGMD Core operations
pub type Result<T> = std::result::Result<T, AnnotationError>;

/// Error types for TGMD Core operations
#[derive(thiserror::Error, Debug)]
pub enum AnnotationError {
    #[error("no action selected")]
    NoActionSelected,

    #[error("start must be marked before end")]
    NoStart,

    #[error("end must exceed start")]
    Ordering { start: f64, end: f64 },

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("time value out of range: {0}")]
    Range(f64),

    #[error("invalid action catalog: {0}")]
    Catalog(String),

    #[error("could not generate a unique segment id after {0} attempts")]
    IdCollision(usize),

    #[error("no video loaded")]
    NoVideoLoaded,

    #[error("segment not found: {0}")]
    UnknownSegment(String),

    #[error("no draft in progress")]
    NoDraft,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnotationError {
    /// Whether the error stems from annotator input and should simply be shown to the user
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, AnnotationError::Io(_) | AnnotationError::Catalog(_))
    }
}
