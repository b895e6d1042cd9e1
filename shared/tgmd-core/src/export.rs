//! Flat CSV export of saved segments

use crate::{Result, Segment, VideoMeta};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// MIME type offered with the exported file
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

/// Fixed column order of the export
pub const CSV_HEADER: [&str; 8] = [
    "video_id",
    "file_path",
    "action",
    "start_sec",
    "end_sec",
    "repetition_id",
    "annotator_id",
    "notes",
];

/// A rendered export, ready to be offered for download or written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvExport {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,

    /// Number of data rows (header excluded)
    pub rows: usize,
}

impl CsvExport {
    /// Render `segments` (expected in store order) for `meta`
    pub fn new(segments: &[Segment], meta: &VideoMeta) -> Self {
        Self {
            file_name: export_file_name(meta),
            mime_type: CSV_MIME_TYPE.to_string(),
            content: serialize(segments, meta),
            rows: segments.len(),
        }
    }

    /// Write the export into `dir` under its file name
    pub async fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.content).await?;
        info!("Exported annotations to {}", path.display());
        Ok(path)
    }
}

/// Serialize segments into CSV text.
///
/// Rows follow the input order; no trailing newline is written.
pub fn serialize(segments: &[Segment], meta: &VideoMeta) -> String {
    let video_id = video_id(&meta.file_name);
    let mut lines = Vec::with_capacity(segments.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for segment in segments {
        let cells = [
            escape_field(&video_id),
            escape_field(&meta.file_path),
            escape_field(segment.action.as_str()),
            format_seconds(segment.start_sec),
            format_seconds(segment.end_sec),
            escape_field(&segment.repetition_id),
            escape_field(segment.annotator_id.as_deref().unwrap_or_default()),
            escape_field(segment.notes.as_deref().unwrap_or_default()),
        ];
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

/// Video id: file name without its last extension, `video` when nothing is left
pub fn video_id(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => file_name,
    };

    if stem.is_empty() {
        "video".to_string()
    } else {
        stem.to_string()
    }
}

/// `{video_id}_annotations.csv`
pub fn export_file_name(meta: &VideoMeta) -> String {
    format!("{}_annotations.csv", video_id(&meta.file_name))
}

/// Quote a cell containing a quote, comma or newline, doubling inner quotes
pub fn escape_field(value: &str) -> String {
    if value.contains('"') || value.contains(',') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// Shortest round-trip form: 1.5, 3.25, 3; exponent form below 1e-6 and from 1e21 (1e-7, 1e+21)
fn format_seconds(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude.is_finite() && (magnitude < 1e-6 || magnitude >= 1e21) {
        let rendered = format!("{:e}", value);
        return match rendered.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => rendered,
        };
    }

    value.to_string()
}
