//! Folder batch processing.
//!
//! Every eligible image in a folder goes through the [`Transformer`] and is
//! written to `<folder>/output/`. The first failing file stops the batch.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{BatchError, PipelineError};
use crate::models::TransformSettings;
use crate::services::Transformer;

/// File extensions picked up by a batch, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "avif", "webp"];

/// Name of the results folder created inside the source folder.
pub const OUTPUT_DIR: &str = "output";

/// Prefix for every written file name.
pub const OUTPUT_PREFIX: &str = "grid_";

const JPEG_QUALITY: u8 = 95;

/// Whether `.avif` files can be decoded in this build.
pub const AVIF_DECODING: bool = cfg!(feature = "avif");

/// Extensions that are listed but cannot be decoded in this build.
pub fn undecodable_extensions() -> Vec<&'static str> {
    SUPPORTED_EXTENSIONS
        .iter()
        .copied()
        .filter(|ext| *ext == "avif" && !AVIF_DECODING)
        .collect()
}

/// Cooperative stop request, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Completed,
    Stopped,
    Failed { file: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub processed_count: usize,
    pub total_count: usize,
    pub status: BatchStatus,
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Eligible images directly inside `folder`, sorted by file name.
pub fn list_images(folder: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = std::fs::read_dir(folder).map_err(|source| BatchError::Folder {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let path = entry.path();
        if is_file && is_supported(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Replace spaces and parentheses with underscores.
pub fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if matches!(c, ' ' | '(' | ')') { '_' } else { c })
        .collect()
}

/// Output location for `source`: `<dir>/output/grid_<stem><ext>`.
///
/// The source extension is kept; [`encode_image`] picks the format from it.
pub fn output_path(source: &Path) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new("."));
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    dir.join(OUTPUT_DIR)
        .join(format!("{OUTPUT_PREFIX}{}{ext}", sanitize_stem(&stem)))
}

/// `path` itself when free, otherwise the first free `<stem>_NN<ext>`.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{stem}_{n:02}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

/// Decode any supported image into 8-bit RGB.
pub fn decode_image(path: &Path) -> Result<RgbImage, PipelineError> {
    let decoded = image::open(path).map_err(|e| PipelineError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(decoded.to_rgb8())
}

/// Write `image` as JPEG (quality 95) for `.jpg`/`.jpeg`, otherwise PNG.
///
/// The file is only created once encoding has succeeded.
pub fn encode_image(image: &RgbImage, path: &Path) -> Result<(), PipelineError> {
    let encode_err = |message: String| PipelineError::Encode {
        path: path.to_path_buf(),
        message,
    };
    let mut buf = Cursor::new(Vec::new());

    if is_jpeg(path) {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
        encoder
            .encode_image(image)
            .map_err(|e| encode_err(e.to_string()))?;
    } else {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder
            .write_header()
            .map_err(|e| encode_err(e.to_string()))?;
        png_writer
            .write_image_data(image.as_raw())
            .map_err(|e| encode_err(e.to_string()))?;
        png_writer.finish().map_err(|e| encode_err(e.to_string()))?;
    }

    std::fs::write(path, buf.into_inner())?;
    Ok(())
}

/// Transform one file and write the result. Returns the written path.
pub fn process_file(
    source: &Path,
    settings: &TransformSettings,
    transformer: &Transformer,
) -> Result<PathBuf, PipelineError> {
    let image = decode_image(source)?;
    let output = transformer.render(settings, &image)?;

    let target = unique_path(&output_path(source));
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)?;
    }
    encode_image(&output.image, &target)?;

    tracing::info!(
        source = %source.display(),
        output = %target.display(),
        width = output.image.width(),
        height = output.image.height(),
        "Processed image"
    );
    Ok(target)
}

/// Process every eligible image in `folder` in file-name order.
///
/// `cancel` is checked before each file; `progress` is called after each
/// successful one. A failing file ends the batch with
/// [`BatchStatus::Failed`]; only a folder that cannot be listed is an `Err`.
pub fn run_batch(
    folder: &Path,
    settings: &TransformSettings,
    transformer: &Transformer,
    cancel: &CancelToken,
    mut progress: impl FnMut(BatchProgress),
) -> Result<BatchResult, BatchError> {
    let files = list_images(folder)?;
    let total = files.len();
    tracing::info!(folder = %folder.display(), total, "Starting batch");

    let mut processed = 0;
    for file in &files {
        if cancel.is_cancelled() {
            tracing::info!(processed, total, "Batch stopped");
            return Ok(BatchResult {
                processed_count: processed,
                total_count: total,
                status: BatchStatus::Stopped,
            });
        }

        if let Err(e) = process_file(file, settings, transformer) {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::warn!(file = %name, error = %e, "Batch failed");
            return Ok(BatchResult {
                processed_count: processed,
                total_count: total,
                status: BatchStatus::Failed {
                    file: name,
                    error: e.to_string(),
                },
            });
        }

        processed += 1;
        progress(BatchProgress {
            completed: processed,
            total,
        });
    }

    tracing::info!(processed, total, "Batch completed");
    Ok(BatchResult {
        processed_count: processed,
        total_count: total,
        status: BatchStatus::Completed,
    })
}
