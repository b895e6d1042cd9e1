use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use tgmd_annotator::{ActionCatalog, ActionId, AnnotationSession, Intent, ManualClock, Segment, VideoMeta};
use tgmd_core::export::serialize;
use tgmd_core::{Draft, DraftEditor, SegmentStore, SequentialIdGenerator};

fn sample_segments(count: usize) -> Vec<Segment> {
    (0..count)
        .map(|i| {
            let action = ActionId::ALL[i % ActionId::ALL.len()];
            // Reverse order so every commit has to re-sort
            let start = (count - i) as f64 * 1.5;
            Segment {
                id: format!("seg-{}", i + 1),
                action,
                start_sec: start,
                end_sec: start + 1.25,
                repetition_id: (i / ActionId::ALL.len() + 1).to_string(),
                annotator_id: Some("bench".to_string()),
                notes: if i % 7 == 0 { Some("slow, \"careful\"".to_string()) } else { None },
            }
        })
        .collect()
}

fn commit_all(segments: &[Segment]) -> SegmentStore {
    let mut editor = DraftEditor::new(
        Arc::new(ActionCatalog::tgmd()),
        Box::new(SequentialIdGenerator::default()),
    );
    let mut store = SegmentStore::new();
    for segment in segments {
        let _ = editor.commit(&Draft::from(segment), &mut store);
    }
    store
}

fn bench_store(c: &mut Criterion) {
    let segments = sample_segments(200);

    c.bench_function("store_commit_200", |b| {
        b.iter(|| black_box(commit_all(&segments).len()))
    });

    let store = commit_all(&segments);
    c.bench_function("store_count_for", |b| {
        b.iter(|| {
            for action in ActionId::ALL {
                black_box(store.count_for(action));
            }
        })
    });
}

fn bench_export(c: &mut Criterion) {
    let meta = VideoMeta::from_file_name("kid_07.mp4");

    for count in [10, 500] {
        let segments = sample_segments(count);
        c.bench_function(&format!("csv_serialize_{}", count), |b| {
            b.iter(|| black_box(serialize(&segments, &meta)))
        });
    }
}

fn bench_session(c: &mut Criterion) {
    c.bench_function("session_annotate_50", |b| {
        b.iter(|| {
            let mut session = AnnotationSession::new(
                Arc::new(ActionCatalog::tgmd()),
                Box::new(SequentialIdGenerator::default()),
            );
            let mut clock = ManualClock::default();
            let _ = session.dispatch(
                Intent::LoadVideo {
                    file_name: "kid_07.mp4".to_string(),
                    file_path: None,
                    duration: 600.0,
                },
                &mut clock,
            );

            for i in 0..50 {
                let start = i as f64 * 2.0;
                let _ = session.dispatch(Intent::SelectAction { id: Some("run".to_string()) }, &mut clock);
                let _ = session.dispatch(Intent::Seek { time: start }, &mut clock);
                let _ = session.dispatch(Intent::MarkStart, &mut clock);
                let _ = session.dispatch(Intent::Seek { time: start + 1.0 }, &mut clock);
                let _ = session.dispatch(Intent::MarkEnd, &mut clock);
                let _ = session.dispatch(Intent::SaveSegment, &mut clock);
            }

            black_box(session.segments().len())
        })
    });
}

criterion_group!(benches, bench_store, bench_export, bench_session);
criterion_main!(benches);
