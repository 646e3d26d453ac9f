use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::BatchError;
use crate::models::TransformSettings;
use crate::services::batch::{run_batch, BatchProgress, BatchResult, CancelToken};
use crate::services::Transformer;

/// Event posted by a running batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Progress(BatchProgress),
    Finished(BatchResult),
    /// The batch could not run at all (e.g. unreadable folder)
    Error(String),
}

/// Handle to a batch started by [`BatchRunner::start`].
pub struct BatchHandle {
    pub events: mpsc::UnboundedReceiver<BatchEvent>,
    pub cancel: CancelToken,
    pub join: JoinHandle<()>,
}

impl BatchHandle {
    /// Request a stop at the next file boundary.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Clears the running flag when the worker exits, even on panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs at most one batch at a time on a blocking worker.
pub struct BatchRunner {
    running: Arc<AtomicBool>,
    transformer: Arc<Transformer>,
}

impl BatchRunner {
    pub fn new(transformer: Arc<Transformer>) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            transformer,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start a batch over `folder`. Must be called from within a tokio
    /// runtime. Fails with [`BatchError::AlreadyRunning`] while another
    /// batch is active.
    pub fn start(
        &self,
        folder: PathBuf,
        settings: TransformSettings,
    ) -> Result<BatchHandle, BatchError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Batch already running, ignoring start request");
            return Err(BatchError::AlreadyRunning);
        }

        let guard = RunningGuard(self.running.clone());
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let transformer = self.transformer.clone();

        let join = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let progress_tx = tx.clone();
            let outcome = run_batch(&folder, &settings, &transformer, &worker_cancel, |p| {
                let _ = progress_tx.send(BatchEvent::Progress(p));
            });
            let event = match outcome {
                Ok(result) => BatchEvent::Finished(result),
                Err(e) => {
                    tracing::warn!(folder = %folder.display(), error = %e, "Batch could not run");
                    BatchEvent::Error(e.to_string())
                }
            };
            let _ = tx.send(event);
        });

        Ok(BatchHandle {
            events: rx,
            cancel,
            join,
        })
    }
}
