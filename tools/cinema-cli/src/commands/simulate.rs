//! Render the CLI release simulation.

use std::path::PathBuf;

use anyhow::Context;

use cinema_common::config::AppConfig;
use cinema_layout::simulation_storyboard;
use cinema_render::{Compositor, EncodeBackend, EncodeJob, FrameSequence, GifEncoder, Magick};

/// Seconds per simulation frame (a 12cs GIF delay).
const FRAME_SECONDS: f64 = 0.12;

pub fn run(
    out: PathBuf,
    tag: String,
    style: crate::options::StyleArgs,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let magick = Magick::detect(config.tools.magick.as_deref())?;
    let (theme, branding) = super::resolve_style(&style, config)?;

    let frames_dir = tempfile::Builder::new()
        .prefix("rc-sim-")
        .tempdir()
        .context("Failed to create a frame directory")?;

    let storyboard = simulation_storyboard(&tag);
    tracing::info!(frames = storyboard.len(), tag = %tag, "Rendering CLI simulation");

    let compositor = Compositor::new(&magick, &theme, &branding);
    let mut sequence = FrameSequence::new(frames_dir.path(), &compositor)?;
    sequence.emit_all(&storyboard)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    GifEncoder::new(&magick).encode(
        &EncodeJob {
            frames: sequence.into_frames(),
            output: out.clone(),
            frame_seconds: FRAME_SECONDS,
            fps: 1,
        },
        None,
    )?;
    println!("✓ Wrote {}", out.display());
    Ok(())
}
