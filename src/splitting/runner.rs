//! The split run: load, partition, write, report.
//!
//! Chunks are written strictly sequentially in increasing offset order, one
//! `Progress` event per chunk, so the consumer may render progress assuming
//! sequential completion. The cancellation flag is checked between chunks;
//! an in-flight chunk write is never interrupted and chunks already written
//! are not rolled back.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;

use super::plan::{chunk_specs, SplitPlan};
use crate::error::SplitError;
use crate::formats::{load_dataset, write_chunk};
use crate::progress::ProgressEvent;

/// Executes a validated plan to completion, cancellation, or failure,
/// delivering events over `events`.
///
/// Emits zero or more `Progress` events followed by exactly one terminal
/// event. A dropped receiver is treated as a cancellation request: the run
/// stops at the next chunk boundary.
pub fn run_split(plan: &SplitPlan, events: &Sender<ProgressEvent>, cancel: &AtomicBool) {
    let mut chunks_written = 0usize;
    let outcome = execute(plan, events, cancel, &mut chunks_written);

    if let Err(err) = &outcome {
        match err {
            SplitError::Cancelled => {
                tracing::info!(chunks_written, "Split cancelled");
            }
            other => {
                tracing::error!(error = %other, chunks_written, "Split failed");
            }
        }
    }

    let _ = events.send(ProgressEvent::from_outcome(outcome, chunks_written));
}

fn execute(
    plan: &SplitPlan,
    events: &Sender<ProgressEvent>,
    cancel: &AtomicBool,
    chunks_written: &mut usize,
) -> Result<usize, SplitError> {
    let dataset = load_dataset(&plan.input_path, plan.input_format)?;
    let total = dataset.row_count();

    tracing::info!(
        input = %plan.input_path.display(),
        rows = total,
        chunk_size = plan.chunk_size,
        export = %plan.export,
        "Starting split"
    );

    for spec in chunk_specs(total, plan.chunk_size) {
        if cancel.load(Ordering::Relaxed) {
            return Err(SplitError::Cancelled);
        }

        let path = plan.chunk_path(spec.index);
        write_chunk(&dataset, spec.start, spec.end, &path, plan.export)?;
        *chunks_written += 1;

        tracing::debug!(
            chunk = spec.index,
            rows = spec.len(),
            path = %path.display(),
            "Wrote chunk"
        );

        let progress = ProgressEvent::Progress {
            rows_done: spec.end,
            rows_total: total,
        };
        if events.send(progress).is_err() {
            // Receiver gone; nobody is listening for the remaining chunks.
            return Err(SplitError::Cancelled);
        }
    }

    tracing::info!(chunks = *chunks_written, rows = total, "Split complete");
    Ok(*chunks_written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::fs;
    use std::sync::atomic::AtomicBool;
    use tempfile::TempDir;

    use crate::formats::ExportFormat;
    use crate::splitting::SplitRequest;

    fn plan_for(dir: &TempDir, rows: usize, chunk_size: usize) -> SplitPlan {
        let input = dir.path().join("people.csv");
        let mut content = String::from("id,name\n");
        for i in 0..rows {
            content.push_str(&format!("{},person{}\n", i, i));
        }
        fs::write(&input, content).expect("Failed to write fixture");

        SplitRequest {
            input_path: input,
            output_dir: dir.path().to_path_buf(),
            chunk_size,
            number_format: "001".into(),
            export: ExportFormat::Csv,
        }
        .validate()
        .expect("fixture request must validate")
    }

    fn collect_events(plan: &SplitPlan, cancel: bool) -> Vec<ProgressEvent> {
        let (tx, rx) = unbounded();
        let flag = AtomicBool::new(cancel);
        run_split(plan, &tx, &flag);
        drop(tx);
        rx.into_iter().collect()
    }

    #[test]
    fn progress_is_monotonic_and_done_is_last() {
        let dir = TempDir::new().unwrap();
        let events = collect_events(&plan_for(&dir, 7, 3), false);

        let mut last_done = 0;
        for event in &events[..events.len() - 1] {
            match event {
                ProgressEvent::Progress {
                    rows_done,
                    rows_total,
                } => {
                    assert!(*rows_done >= last_done, "rows_done must not decrease");
                    assert_eq!(*rows_total, 7);
                    last_done = *rows_done;
                }
                other => panic!("Only Progress may precede the terminal event: {:?}", other),
            }
        }
        assert_eq!(last_done, 7, "Final Progress equals the total");
        assert_eq!(events.last(), Some(&ProgressEvent::Done { chunks: 3 }));
    }

    #[test]
    fn empty_dataset_emits_only_done() {
        let dir = TempDir::new().unwrap();
        let events = collect_events(&plan_for(&dir, 0, 3), false);
        assert_eq!(events, vec![ProgressEvent::Done { chunks: 0 }]);

        let chunk_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("_0"))
            .collect();
        assert!(chunk_files.is_empty(), "No chunk files for an empty dataset");
    }

    #[test]
    fn pre_set_cancel_flag_stops_before_first_chunk() {
        let dir = TempDir::new().unwrap();
        let events = collect_events(&plan_for(&dir, 7, 3), true);

        assert_eq!(events, vec![ProgressEvent::Cancelled { chunks: 0 }]);
        assert!(
            !dir.path().join("people_001.csv").exists(),
            "Cancellation before the first chunk writes nothing"
        );
    }

    #[test]
    fn write_failure_keeps_earlier_chunks_and_stops() {
        let dir = TempDir::new().unwrap();
        let plan = plan_for(&dir, 5, 1);

        // A directory squatting on chunk 3's output path makes its atomic
        // rename fail.
        fs::create_dir(dir.path().join("people_003.csv")).unwrap();

        let events = collect_events(&plan, false);

        assert!(
            matches!(events.last(), Some(ProgressEvent::Failed { .. })),
            "Run must end with Failed, got {:?}",
            events.last()
        );
        let progress_count = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Progress { .. }))
            .count();
        assert_eq!(progress_count, 2, "Only chunks 1 and 2 completed");

        assert!(dir.path().join("people_001.csv").is_file());
        assert!(dir.path().join("people_002.csv").is_file());
        assert!(!dir.path().join("people_004.csv").exists());
        assert!(!dir.path().join("people_005.csv").exists());
    }

    #[test]
    fn dropped_receiver_cancels_the_run() {
        let dir = TempDir::new().unwrap();
        let plan = plan_for(&dir, 6, 2);

        let (tx, rx) = unbounded();
        drop(rx);
        let flag = AtomicBool::new(false);
        run_split(&plan, &tx, &flag);

        assert!(
            dir.path().join("people_001.csv").is_file(),
            "First chunk was already written when the disconnect was seen"
        );
        assert!(!dir.path().join("people_002.csv").exists());
    }
}
