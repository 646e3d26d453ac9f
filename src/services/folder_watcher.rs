//! Folder watcher for the batch source folder.
//!
//! Polls the folder and broadcasts the current list of eligible images
//! whenever it changes.

use notify::{Config, PollWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

use crate::services::batch::list_images;

/// Event sent when the set of eligible images changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderChangeEvent {
    /// Current eligible files, sorted by name
    pub files: Vec<PathBuf>,
}

/// Polling watcher over one folder.
pub struct FolderWatcher {
    sender: broadcast::Sender<FolderChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: PollWatcher,
    folder: PathBuf,
}

impl FolderWatcher {
    /// Start watching `folder`, polling every `interval`. Must be called
    /// from within a tokio runtime.
    pub fn new(folder: PathBuf, interval: Duration) -> Result<Self, notify::Error> {
        let (sender, _) = broadcast::channel(16);
        let watcher = Self::start_watcher(&folder, interval, sender.clone())?;
        tracing::info!(path = %folder.display(), "Folder watcher started");

        Ok(Self {
            sender,
            _watcher: watcher,
            folder,
        })
    }

    fn start_watcher(
        folder: &Path,
        interval: Duration,
        sender: broadcast::Sender<FolderChangeEvent>,
    ) -> Result<PollWatcher, notify::Error> {
        let (tx, mut rx) = mpsc::channel::<()>(100);

        // Rescan on every raw event, broadcast only real listing changes
        let scan_folder = folder.to_path_buf();
        let mut last = list_images(&scan_folder).unwrap_or_default();
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                while rx.try_recv().is_ok() {}
                let files = match list_images(&scan_folder) {
                    Ok(files) => files,
                    Err(e) => {
                        tracing::debug!(error = %e, "Rescan failed");
                        Vec::new()
                    }
                };
                if files != last {
                    tracing::debug!(count = files.len(), "Folder contents changed");
                    last = files.clone();
                    let _ = sender.send(FolderChangeEvent { files });
                }
            }
        });

        let mut watcher = PollWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                if res.is_ok() {
                    let _ = tx.try_send(());
                }
            },
            Config::default().with_poll_interval(interval),
        )?;

        watcher.watch(folder, RecursiveMode::NonRecursive)?;

        Ok(watcher)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FolderChangeEvent> {
        self.sender.subscribe()
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}
