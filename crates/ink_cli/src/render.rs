//! Headless reveal rendering
//!
//! Drives an [`InkReveal`] from a simulated display clock and writes the
//! flattened layer stack of each frame as a PNG.

use crate::config::{CliConfig, RenderConfig};
use anyhow::{Context, Result};
use ink_animation::ManualScheduler;
use ink_core::{RevealEvent, Size};
use ink_image::{ImageData, ImageSource};
use ink_reveal::{parse_hex_color, FixedSurface, InkReveal, LayerStack, Surface};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound on simulated frames, in case the clock never completes
const MAX_FRAMES: u32 = 100_000;

pub struct RenderSummary {
    pub frames: u32,
    pub written: u32,
    pub elapsed_ms: f64,
}

pub fn render(config: &CliConfig, source: &Path) -> Result<RenderSummary> {
    let render = &config.render;
    let reveal_config = config.reveal.clone();

    let background = parse_hex_color(&reveal_config.background_color)
        .with_context(|| format!("Invalid background colour {}", reveal_config.background_color))?;

    let surface = FixedSurface::new(Size::new(render.width, render.height), render.dpr);
    let mut reveal = InkReveal::new(reveal_config, ManualScheduler::new(), surface)?;

    reveal.on_any(|event| match event {
        RevealEvent::Progress(_) => {}
        other => debug!(?other, "reveal event"),
    });

    reveal
        .load(ImageSource::file(source))
        .with_context(|| format!("Failed to load {}", source.display()))?;
    let image = reveal
        .image()
        .cloned()
        .context("Source image missing after load")?;

    let placeholder = load_placeholder(render, &image, reveal.config().placeholder_blur)?;
    let stack = LayerStack::new(background, reveal.config().compositor()).with_placeholder(placeholder);

    fs::create_dir_all(&render.output)
        .with_context(|| format!("Failed to create {}", render.output.display()))?;

    // The command line is the host's go-ahead; there is no viewport to wait for
    reveal.trigger();

    let frame_ms = 1000.0 / render.fps.max(1) as f64;
    let every = render.every.max(1);
    let mut now = 0.0;
    let mut frames = 0;
    let mut written = 0;

    while !reveal.is_complete() && frames < MAX_FRAMES {
        if reveal.pump(now) {
            if frames % every == 0 && !reveal.is_complete() {
                write_frame(&stack, &reveal, &image, render, &frame_path(&render.output, written))?;
                written += 1;
            }
            frames += 1;
        }
        now += frame_ms;
    }

    if !reveal.is_complete() {
        anyhow::bail!("Reveal did not complete within {MAX_FRAMES} frames");
    }

    write_frame(&stack, &reveal, &image, render, &frame_path(&render.output, written))?;
    written += 1;

    info!(
        "Rendered {} frames ({} written) to {}",
        frames,
        written,
        render.output.display()
    );

    Ok(RenderSummary {
        frames,
        written,
        elapsed_ms: now,
    })
}

fn load_placeholder(render: &RenderConfig, image: &ImageData, blur: f32) -> Result<ImageData> {
    let base = match &render.placeholder {
        Some(path) => ImageData::load(ImageSource::file(path))
            .with_context(|| format!("Failed to load placeholder {}", path.display()))?,
        None => image.clone(),
    };
    base.blurred(blur).context("Failed to blur placeholder")
}

fn write_frame(
    stack: &LayerStack,
    reveal: &InkReveal,
    source: &ImageData,
    render: &RenderConfig,
    path: &Path,
) -> Result<()> {
    let logical = Size::new(render.width, render.height);

    // With animation disabled nothing is ever drawn; flatten over an empty canvas
    let blank;
    let surface = match reveal.surface() {
        Some(surface) => surface,
        None => {
            let dpr = if reveal.config().high_dpi { render.dpr } else { 1.0 };
            blank = Surface::new(logical, dpr)?;
            &blank
        }
    };
    let pixmap = stack.flatten(surface, source, reveal.opacity(), reveal.placeholder_visible())?;

    let frame: image::RgbaImage = ImageData::from_pixmap(pixmap).to_rgba_image();
    frame
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), progress = reveal.progress(), "wrote frame");
    Ok(())
}

fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}
