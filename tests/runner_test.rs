//! Background batch runner.

mod common;

use common::*;
use gridsmith::error::BatchError;
use gridsmith::models::TransformSettings;
use gridsmith::services::{BatchEvent, BatchRunner, BatchStatus, Transformer};
use pretty_assertions::assert_eq;
use std::sync::Arc;

async fn drain(handle: &mut gridsmith::services::BatchHandle) -> Vec<BatchEvent> {
    let mut events = Vec::new();
    while let Some(event) = handle.events.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_runner_reports_progress_and_result() {
    let dir = scratch_folder();
    write_image(dir.path(), "a.png", &gradient(16, 16));
    write_image(dir.path(), "b.png", &gradient(16, 16));

    let runner = BatchRunner::new(Arc::new(Transformer::default()));
    let mut handle = runner
        .start(dir.path().to_path_buf(), TransformSettings::default())
        .unwrap();

    let events = drain(&mut handle).await;
    handle.join.await.unwrap();

    assert_eq!(events.len(), 3);
    match events.last() {
        Some(BatchEvent::Finished(result)) => {
            assert_eq!(result.status, BatchStatus::Completed);
            assert_eq!(result.processed_count, 2);
        }
        other => panic!("Expected Finished, got {other:?}"),
    }
    assert!(!runner.is_running());
}

#[tokio::test]
async fn test_runner_rejects_reentry() {
    let dir = scratch_folder();
    for i in 0..4 {
        write_image(dir.path(), &format!("{i}.png"), &gradient(64, 64));
    }

    let runner = BatchRunner::new(Arc::new(Transformer::default()));
    let mut first = runner
        .start(dir.path().to_path_buf(), TransformSettings::default())
        .unwrap();

    let second = runner.start(dir.path().to_path_buf(), TransformSettings::default());
    assert!(matches!(second, Err(BatchError::AlreadyRunning)));

    drain(&mut first).await;
    first.join.await.unwrap();

    // flag is released once the worker exits
    let mut third = runner
        .start(dir.path().to_path_buf(), TransformSettings::default())
        .unwrap();
    drain(&mut third).await;
    third.join.await.unwrap();
}

#[tokio::test]
async fn test_runner_missing_folder_reports_error() {
    let runner = BatchRunner::new(Arc::new(Transformer::default()));
    let mut handle = runner
        .start("/nonexistent/gridsmith".into(), TransformSettings::default())
        .unwrap();

    let events = drain(&mut handle).await;
    handle.join.await.unwrap();
    assert!(matches!(events.as_slice(), [BatchEvent::Error(_)]));
}
