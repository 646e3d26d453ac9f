use std::path::PathBuf;
use thiserror::Error;

/// Failure while running one image through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("Label rendering error: {0}")]
    Labels(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("Palette error: {0}")]
    Palette(#[from] pixel_palette::PaletteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to start or run a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("A batch is already running")]
    AlreadyRunning,

    #[error("Cannot read folder {}: {source}", path.display())]
    Folder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
