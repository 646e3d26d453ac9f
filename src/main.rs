use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridsmith::models::TransformSettings;
use gridsmith::rendering::LabelRenderer;
use gridsmith::services::batch::{decode_image, encode_image};
use gridsmith::services::{BatchEvent, BatchRunner, BatchStatus, FolderWatcher, Transformer};

const DEFAULT_CONFIG_FILE: &str = "gridsmith.yaml";

#[derive(Parser)]
#[command(name = "gridsmith")]
#[command(about = "Grid overlays and pixel art for reference images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every image in a folder into <FOLDER>/output
    Batch {
        /// Folder with source images
        folder: PathBuf,

        /// Settings file (defaults to $CONFIG_FILE)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Render a single image
    Render {
        /// Source image
        input: PathBuf,

        /// Output file (.png or .jpg)
        #[arg(short, long)]
        output: PathBuf,

        /// Settings file (defaults to $CONFIG_FILE)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Watch a folder and report added or removed images
    Watch {
        /// Folder to watch
        folder: PathBuf,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Write the default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,

        /// Target path (defaults to $CONFIG_FILE or gridsmith.yaml)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Batch { folder, config }) => {
            init_tracing();
            run_batch_command(folder, config).await
        }
        Some(Commands::Render {
            input,
            output,
            config,
        }) => {
            init_tracing();
            run_render_command(&input, &output, config)
        }
        Some(Commands::Watch {
            folder,
            interval_ms,
        }) => {
            init_tracing();
            run_watch_command(folder, Duration::from_millis(interval_ms)).await
        }
        Some(Commands::Init { force, output }) => run_init_command(force, output),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridsmith=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Settings from `--config`, then `$CONFIG_FILE`, then defaults.
fn load_settings(config: Option<PathBuf>) -> TransformSettings {
    let path = config.or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
    match path {
        Some(path) => TransformSettings::load(&path),
        None => {
            tracing::info!("No settings file given, using defaults");
            TransformSettings::default()
        }
    }
}

fn build_transformer() -> Arc<Transformer> {
    let fonts_dir = std::env::var("FONTS_DIR").ok().map(PathBuf::from);
    let labels = LabelRenderer::new(fonts_dir.as_deref());
    Arc::new(Transformer::new(Arc::new(labels)))
}

/// Run a batch on a worker, printing progress. Ctrl-C requests a stop.
async fn run_batch_command(folder: PathBuf, config: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = load_settings(config);
    let runner = BatchRunner::new(build_transformer());
    let mut handle = runner.start(folder.clone(), settings)?;

    let mut stop_requested = false;
    let outcome = loop {
        tokio::select! {
            event = handle.events.recv() => match event {
                Some(BatchEvent::Progress(p)) => {
                    println!("[{}/{}] processed", p.completed, p.total);
                }
                Some(BatchEvent::Finished(result)) => break Ok(result),
                Some(BatchEvent::Error(e)) => break Err(anyhow::anyhow!(e)),
                None => break Err(anyhow::anyhow!("Batch worker exited without a result")),
            },
            _ = tokio::signal::ctrl_c(), if !stop_requested => {
                println!("Stopping after the current file...");
                stop_requested = true;
                handle.stop();
            }
        }
    };
    handle.join.await.context("Batch worker panicked")?;

    let result = outcome?;
    match result.status {
        BatchStatus::Completed => {
            println!(
                "Done: {} of {} images written to {}",
                result.processed_count,
                result.total_count,
                folder.join("output").display()
            );
            Ok(())
        }
        BatchStatus::Stopped => {
            println!(
                "Stopped: {} of {} images processed",
                result.processed_count, result.total_count
            );
            Ok(())
        }
        BatchStatus::Failed { file, error } => Err(anyhow::anyhow!(
            "Failed on {file} after {} of {} images: {error}",
            result.processed_count,
            result.total_count
        )),
    }
}

/// Render one image directly to a file
fn run_render_command(input: &Path, output: &Path, config: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = load_settings(config);
    let transformer = build_transformer();

    let image = decode_image(input)?;
    let rendered = transformer.render(&settings, &image)?;
    encode_image(&rendered.image, output)
        .with_context(|| format!("Writing {}", output.display()))?;

    let (w, h) = rendered.image.dimensions();
    match rendered.small_size {
        Some((sw, sh)) => println!(
            "Rendered {} ({w}x{h}, {sw}x{sh} cells, grid {})",
            output.display(),
            rendered.grid_rows
        ),
        None => println!(
            "Rendered {} ({w}x{h}, grid {})",
            output.display(),
            rendered.grid_rows
        ),
    }
    Ok(())
}

/// Log folder listing changes until Ctrl-C
async fn run_watch_command(folder: PathBuf, interval: Duration) -> anyhow::Result<()> {
    let watcher = FolderWatcher::new(folder.clone(), interval)
        .with_context(|| format!("Watching {}", folder.display()))?;
    let mut events = watcher.subscribe();

    let initial = gridsmith::services::list_images(&folder)?;
    println!("Watching {} ({} images)", watcher.folder().display(), initial.len());
    let mut known = initial;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(change) => {
                    for added in change.files.iter().filter(|f| !known.contains(f)) {
                        println!("  + {}", added.display());
                    }
                    for removed in known.iter().filter(|f| !change.files.contains(f)) {
                        println!("  - {}", removed.display());
                    }
                    known = change.files;
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Missed folder events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

/// Write the default settings file
fn run_init_command(force: bool, output: Option<PathBuf>) -> anyhow::Result<()> {
    let path = output
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if path.exists() && !force {
        println!(
            "Skipped existing {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    let yaml = TransformSettings::default().to_yaml()?;
    std::fs::write(&path, yaml).with_context(|| format!("Writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let fonts_dir = std::env::var("FONTS_DIR").ok();

    println!("Gridsmith v{VERSION}");
    println!("Grid overlays and pixel art for reference images\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  FONTS_DIR   = {}",
        fonts_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nSettings:");
    match config_file {
        Some(ref path) if Path::new(path).exists() => println!("  {path}"),
        Some(ref path) => println!("  defaults ({path} not found)"),
        None => println!("  defaults"),
    }

    println!("\nInput formats:");
    println!("  {}", gridsmith::services::SUPPORTED_EXTENSIONS.join(", "));
    for ext in gridsmith::services::undecodable_extensions() {
        println!("  .{ext} files are listed but not decodable (build with --features {ext})");
    }

    println!("\nCommands:");
    println!("  gridsmith batch    Process a folder of images");
    println!("  gridsmith render   Render a single image");
    println!("  gridsmith watch    Watch a folder for new images");
    println!("  gridsmith init     Write the default settings file");
    println!("\nRun 'gridsmith --help' for more details.");
}
