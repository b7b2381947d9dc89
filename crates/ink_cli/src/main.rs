//! Ink Reveal CLI
//!
//! Render ink reveals headlessly, scaffold configuration, and inspect blob
//! layouts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ink_animation::Easing;
use ink_reveal::{BlobGenerator, Pattern};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod render;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "ink-reveal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ink blob image reveal renderer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a reveal of an image to a directory of PNG frames
    Render {
        /// Source image (PNG or JPEG)
        image: PathBuf,

        /// Configuration file or directory containing reveal.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spatial pattern (random, center, corners, spiral, wave, explosion)
        #[arg(short, long)]
        pattern: Option<Pattern>,

        /// Easing curve (linear, easeOut, easeOutStrong, easeInOut, easeOutElastic, easeOutBounce)
        #[arg(short, long)]
        easing: Option<Easing>,

        /// RNG seed for a reproducible layout
        #[arg(long)]
        seed: Option<u64>,

        /// Reveal duration in milliseconds
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Write a reveal.toml with default settings
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the generated blob layout as JSON
    Blobs {
        /// Configuration file or directory containing reveal.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Spatial pattern
        #[arg(short, long)]
        pattern: Option<Pattern>,

        /// Number of blobs
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// RNG seed for a reproducible layout
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the available patterns and easing curves
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            image,
            config,
            output,
            pattern,
            easing,
            seed,
            duration,
        } => {
            let mut config = CliConfig::load_or_default(config.as_deref())?;
            if let Some(output) = output {
                config.render.output = output;
            }
            let reveal = &mut config.reveal;
            reveal.pattern = pattern.unwrap_or(reveal.pattern);
            reveal.easing = easing.unwrap_or(reveal.easing);
            reveal.seed = seed.or(reveal.seed);
            reveal.duration_ms = duration.unwrap_or(reveal.duration_ms);
            cmd_render(&config, &image)
        }

        Commands::Init { path, force } => cmd_init(&path, force),

        Commands::Blobs {
            config,
            pattern,
            count,
            seed,
        } => {
            let mut config = CliConfig::load_or_default(config.as_deref())?;
            let reveal = &mut config.reveal;
            reveal.pattern = pattern.unwrap_or(reveal.pattern);
            reveal.blob_count = count.unwrap_or(reveal.blob_count);
            reveal.seed = seed.or(reveal.seed);
            cmd_blobs(&config)
        }

        Commands::Info => cmd_info(),
    }
}

fn cmd_render(config: &CliConfig, image: &Path) -> Result<()> {
    info!(
        "Rendering {} ({} pattern, {} ms)",
        image.display(),
        config.reveal.pattern,
        config.reveal.duration_ms
    );

    let summary = render::render(config, image)?;

    info!(
        "Done: {} frames over {:.0} ms, {} written",
        summary.frames, summary.elapsed_ms, summary.written
    );
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    let target = CliConfig::scaffold(path, force)?;

    info!("Wrote {}", target.display());
    info!("Run `ink-reveal render <image>` to render frames");
    Ok(())
}

fn cmd_blobs(config: &CliConfig) -> Result<()> {
    config.reveal.validate()?;

    let mut generator = BlobGenerator::new(config.reveal.seed);
    let blobs = generator.generate(&config.reveal.layout());

    let json = serde_json::to_string_pretty(&blobs).context("Failed to serialize blobs")?;
    println!("{json}");
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("Patterns:");
    for pattern in Pattern::ALL {
        println!("  {pattern}");
    }
    println!("Easing curves:");
    for easing in Easing::ALL {
        println!("  {easing}");
    }
    Ok(())
}
