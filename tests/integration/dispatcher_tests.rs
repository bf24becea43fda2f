//! Batch dispatch tests.
//!
//! Tests verify:
//! - One failing image does not affect the others
//! - Every launched worker is collected exactly once
//! - Bounded and unbounded pools produce the same output
//! - Batch-fatal input errors are raised before any worker runs

use std::collections::HashSet;
use std::fs;

use image_slicer::{
    list_inputs, read_manifest, BatchError, Dispatcher, GridSpec, SliceOptions, SliceOutcome,
    TileOrigin,
};

use super::test_utils::Workspace;

fn grid(rows: u32, cols: u32) -> GridSpec {
    GridSpec::new(rows, cols).unwrap()
}

#[tokio::test]
async fn test_good_and_corrupt_image() {
    let ws = Workspace::new();
    ws.add_png("a.png", 100, 100);
    ws.add_raw("b.png", b"\x89PNG\r\n\x1a\ncorrupted beyond repair");

    let inputs = list_inputs(ws.input_dir()).unwrap();
    let report = Dispatcher::new(SliceOptions::default())
        .run(inputs, ws.output_dir(), grid(2, 2))
        .await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);

    assert_eq!(
        ws.output_files(),
        vec!["a-11.png", "a-12.png", "a-21.png", "a-22.png", "a.json"]
    );
    let origins = read_manifest(&ws.output_dir().join("a.json")).unwrap();
    assert_eq!(
        origins,
        vec![
            TileOrigin { x: 0, y: 0 },
            TileOrigin { x: 50, y: 0 },
            TileOrigin { x: 0, y: 50 },
            TileOrigin { x: 50, y: 50 },
        ]
    );

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].file_name(), "b.png");
    match &failures[0].outcome {
        SliceOutcome::Failure(err) => assert_eq!(err.kind(), "decode"),
        SliceOutcome::Success(_) => panic!("b.png should have failed"),
    }
}

#[tokio::test]
async fn test_mixed_directory() {
    let ws = Workspace::new();
    ws.add_png("one.png", 30, 30);
    ws.add_jpeg("two.jpg", 30, 30);
    ws.add_raw("three.gif", b"GIF89a");
    ws.add_raw("notes.txt", b"hello");
    fs::create_dir(ws.input_dir().join("nested")).unwrap();

    let inputs = list_inputs(ws.input_dir()).unwrap();
    assert_eq!(inputs.len(), 4);

    let report = Dispatcher::new(SliceOptions::default())
        .run(inputs, ws.output_dir(), grid(3, 3))
        .await;

    assert_eq!(report.total(), 4);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 2);

    let kinds: HashSet<&str> = report
        .failures()
        .filter_map(|r| match &r.outcome {
            SliceOutcome::Failure(err) => Some(err.kind()),
            SliceOutcome::Success(_) => None,
        })
        .collect();
    assert_eq!(kinds, HashSet::from(["format"]));

    assert_eq!(ws.output_files_for("one").len(), 10);
    assert_eq!(ws.output_files_for("two").len(), 10);
    assert!(ws.output_files_for("three").is_empty());
}

#[tokio::test]
async fn test_exactly_once_collection() {
    let ws = Workspace::new();
    let mut inputs = Vec::new();
    // Vary sizes so workers finish in a different order than they start
    for i in 0..12u32 {
        inputs.push(ws.add_png(&format!("img{i:02}.png"), 200 - i * 15, 40));
    }

    let mut callbacks = 0;
    let mut last_percent = 0;
    let report = Dispatcher::new(SliceOptions::default())
        .run_with(inputs, ws.output_dir(), grid(2, 2), |_, progress| {
            callbacks += 1;
            assert!(progress.percent() >= last_percent);
            last_percent = progress.percent();
        })
        .await;

    assert_eq!(callbacks, 12);
    assert_eq!(last_percent, 100);
    assert_eq!(report.reports.len(), 12);

    let indices: Vec<usize> = {
        let mut v: Vec<usize> = report.reports.iter().map(|r| r.index).collect();
        v.sort_unstable();
        v
    };
    assert_eq!(indices, (0..12).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_bounded_and_unbounded_match() {
    let bounded = Workspace::new();
    let unbounded = Workspace::new();
    for ws in [&bounded, &unbounded] {
        for i in 0..5 {
            ws.add_png(&format!("p{i}.png"), 50 + i, 31);
        }
    }

    let run = |ws: &Workspace, workers: Option<usize>| {
        let inputs = list_inputs(ws.input_dir()).unwrap();
        let output = ws.output_dir().to_path_buf();
        let dispatcher = Dispatcher::new(SliceOptions::default()).with_max_workers(workers);
        async move { dispatcher.run(inputs, &output, grid(3, 2)).await }
    };

    let a = run(&bounded, Some(1)).await;
    let b = run(&unbounded, None).await;

    assert_eq!(a.succeeded, 5);
    assert_eq!(b.succeeded, 5);
    assert_eq!(bounded.output_files(), unbounded.output_files());

    for name in bounded.output_files().iter().filter(|n| n.ends_with(".json")) {
        let x = fs::read(bounded.output_dir().join(name)).unwrap();
        let y = fs::read(unbounded.output_dir().join(name)).unwrap();
        assert_eq!(x, y, "{name}");
    }
}

#[tokio::test]
async fn test_huge_grid_is_reported_per_image() {
    let ws = Workspace::new();
    ws.add_png("a.png", 4, 4);
    ws.add_jpeg("b.jpg", 40, 40);

    let huge = GridSpec::clamped(200_000, 200_000);
    let inputs = list_inputs(ws.input_dir()).unwrap();
    let report = Dispatcher::new(SliceOptions::default())
        .run(inputs, ws.output_dir(), huge)
        .await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.reports.len(), 2);
    assert_eq!(report.failed, 2);
    for slice_report in &report.reports {
        match &slice_report.outcome {
            SliceOutcome::Failure(err) => assert_eq!(err.kind(), "tile-write"),
            SliceOutcome::Success(_) => panic!("{} should have failed", slice_report.file_name()),
        }
    }
    assert!(ws.output_files().is_empty());
}

#[test]
fn test_empty_input_directory_is_fatal() {
    let ws = Workspace::new();
    assert!(matches!(
        list_inputs(ws.input_dir()),
        Err(BatchError::InputEmpty { .. })
    ));
}

#[test]
fn test_unreadable_input_directory_is_fatal() {
    let ws = Workspace::new();
    let missing = ws.input_dir().join("does-not-exist");
    assert!(matches!(
        list_inputs(&missing),
        Err(BatchError::InputUnreadable { .. })
    ));
}
