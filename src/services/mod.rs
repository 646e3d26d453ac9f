pub mod batch;
pub mod batch_runner;
pub mod folder_watcher;
pub mod preview;
pub mod transformer;

pub use batch::{
    list_images, process_file, run_batch, undecodable_extensions, BatchProgress, BatchResult,
    BatchStatus, CancelToken, SUPPORTED_EXTENSIONS,
};
pub use batch_runner::{BatchEvent, BatchHandle, BatchRunner};
pub use folder_watcher::{FolderChangeEvent, FolderWatcher};
pub use preview::PreviewSession;
pub use transformer::{effective_grid_rows, RenderOutput, Transformer};
