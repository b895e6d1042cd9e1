//! Scripted replay of intents against a session

use crate::intent::Intent;
use crate::playback::ManualClock;
use crate::session::{AnnotationSession, SessionEvent};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tgmd_core::CsvExport;
use tracing::{info, warn};

/// One intent the session refused
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedIntent {
    /// 1-based position in the script
    pub step: usize,
    pub intent: &'static str,
    pub reason: String,
}

/// Summary of a replay run
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: Vec<RejectedIntent>,
    pub exports: Vec<CsvExport>,
}

impl ReplayReport {
    pub fn total(&self) -> usize {
        self.applied + self.rejected.len()
    }
}

/// Drives a session from a list of intents with a manual clock
#[derive(Debug)]
pub struct Replay {
    session: AnnotationSession,
    clock: ManualClock,
}

impl Replay {
    pub fn new(session: AnnotationSession) -> Self {
        Self {
            session,
            clock: ManualClock::default(),
        }
    }

    pub fn session(&self) -> &AnnotationSession {
        &self.session
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Apply every intent in order.
    ///
    /// Rejected intents are recorded and leave the session unchanged;
    /// non-recoverable errors abort the run.
    pub fn run(&mut self, intents: Vec<Intent>) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();

        for (index, intent) in intents.into_iter().enumerate() {
            let step = index + 1;
            let name = intent.name();

            match self.session.dispatch(intent, &mut self.clock) {
                Ok(SessionEvent::Exported(export)) => {
                    info!("📤 [{}] Rendered {} ({} rows)", step, export.file_name, export.rows);
                    report.exports.push(export);
                    report.applied += 1;
                }
                Ok(event) => {
                    info!("▶️ [{}] {}", step, event);
                    report.applied += 1;
                }
                Err(e) if e.is_user_facing() => {
                    warn!("⚠️ [{}] {} rejected: {}", step, name, e);
                    report.rejected.push(RejectedIntent {
                        step,
                        intent: name,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(report)
    }
}

/// Write an export into `dir`, honouring the overwrite policy.
///
/// Returns `None` when an existing file was kept.
pub async fn write_export(export: &CsvExport, dir: &Path, overwrite: bool) -> Result<Option<PathBuf>> {
    let target = dir.join(&export.file_name);
    if !overwrite && tokio::fs::try_exists(&target).await? {
        warn!("Keeping existing export {}", target.display());
        return Ok(None);
    }

    Ok(Some(export.save_to_dir(dir).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::parse_script;
    use crate::playback::TimeSource;
    use crate::session::AnnotatorIdentity;
    use std::sync::Arc;
    use tgmd_core::{ActionCatalog, SequentialIdGenerator};

    fn replay() -> Replay {
        Replay::new(
            AnnotationSession::new(
                Arc::new(ActionCatalog::tgmd()),
                Box::new(SequentialIdGenerator::default()),
            )
            .with_user(Some(AnnotatorIdentity::new("ana"))),
        )
    }

    #[test]
    fn test_rejections_are_recorded() {
        let intents = parse_script(
            r#"[
                {"intent": "load_video", "file_name": "clip.mp4", "duration": 10},
                {"intent": "mark_start"},
                {"intent": "select_action", "id": "run"},
                {"intent": "mark_end"},
                {"intent": "seek", "time": 2},
                {"intent": "mark_start"},
                {"intent": "mark_end"}
            ]"#,
        )
        .unwrap();

        let mut replay = replay();
        let report = replay.run(intents).unwrap();

        assert_eq!(report.total(), 7);
        let steps: Vec<usize> = report.rejected.iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![2, 4, 7]);
        assert_eq!(report.rejected[0].reason, "no action selected");
        assert_eq!(report.rejected[1].reason, "start must be marked before end");
        assert_eq!(report.rejected[2].reason, "end must exceed start");
    }

    #[test]
    fn test_export_intent_collects_csv() {
        let intents = parse_script(
            r#"[
                {"intent": "load_video", "file_name": "clip.mp4", "duration": 10},
                {"intent": "select_action", "id": "run"},
                {"intent": "seek", "time": 1.5},
                {"intent": "mark_start"},
                {"intent": "seek", "time": 3.25},
                {"intent": "mark_end"},
                {"intent": "update_draft", "notes": "ok, fine"},
                {"intent": "save_segment"},
                {"intent": "export"}
            ]"#,
        )
        .unwrap();

        let mut replay = replay();
        let report = replay.run(intents).unwrap();

        assert!(report.rejected.is_empty());
        assert_eq!(report.exports.len(), 1);
        assert_eq!(
            report.exports[0].content,
            "video_id,file_path,action,start_sec,end_sec,repetition_id,annotator_id,notes\n\
             clip,clip.mp4,run,1.5,3.25,1,ana,\"ok, fine\""
        );
        assert_eq!(replay.clock().current_time(), 3.25);
    }
}
