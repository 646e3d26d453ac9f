//! Folder watcher: rescans and broadcasts eligible listings.

mod common;

use common::*;
use gridsmith::services::{FolderChangeEvent, FolderWatcher};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

const POLL: Duration = Duration::from_millis(50);

async fn next_event(
    rx: &mut broadcast::Receiver<FolderChangeEvent>,
    wait: Duration,
) -> Option<FolderChangeEvent> {
    timeout(wait, rx.recv()).await.ok().and_then(|r| r.ok())
}

fn names(event: &FolderChangeEvent) -> Vec<String> {
    event
        .files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_broadcasts_new_image() {
    let dir = scratch_folder();
    let watcher = FolderWatcher::new(dir.path().to_path_buf(), POLL).unwrap();
    assert_eq!(watcher.folder(), dir.path());
    let mut rx = watcher.subscribe();

    write_image(dir.path(), "tile.png", &gradient(8, 8));

    let event = next_event(&mut rx, Duration::from_secs(5))
        .await
        .expect("no change event for new image");
    assert_eq!(names(&event), vec!["tile.png".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_ignores_non_image_files() {
    let dir = scratch_folder();
    let watcher = FolderWatcher::new(dir.path().to_path_buf(), POLL).unwrap();
    let mut rx = watcher.subscribe();

    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    std::fs::create_dir(dir.path().join("output")).unwrap();

    assert!(next_event(&mut rx, POLL * 8).await.is_none());

    // the listing only changes once an eligible file shows up
    write_image(dir.path(), "a.jpg", &gradient(8, 8));
    let event = next_event(&mut rx, Duration::from_secs(5))
        .await
        .expect("no change event for new image");
    assert_eq!(names(&event), vec!["a.jpg".to_string()]);
}
