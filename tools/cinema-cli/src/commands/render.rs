//! Render the trailer slideshow.

use std::path::PathBuf;

use anyhow::Context;

use cinema_common::config::AppConfig;
use cinema_layout::trailer_storyboard;
use cinema_render::{
    clear_stale_frames, Compositor, EncodeBackend, EncodeJob, FfmpegEncoder, FrameSequence,
    GifEncoder, Magick,
};

use crate::options::{RangeArgs, StyleArgs};

pub fn run(
    range: RangeArgs,
    out_dir: PathBuf,
    slide_seconds: f64,
    fps: u32,
    style: StyleArgs,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let git = super::repository(config);
    git.ensure_repository()?;
    let magick = Magick::detect(config.tools.magick.as_deref())?;
    let ffmpeg = FfmpegEncoder::detect(&config.tools.ffmpeg)?;
    let (theme, branding) = super::resolve_style(&style, config)?;

    let slide_seconds = if slide_seconds.is_finite() {
        slide_seconds.max(1.0)
    } else {
        1.0
    };
    let fps = fps.max(1);

    let analysis = cinema_history::analyze(&git, &range.request())?;
    tracing::info!(
        range = %analysis.range.spec(),
        commits = analysis.stats.commits,
        files = analysis.stats.files,
        "Rendering trailer"
    );

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    clear_stale_frames(&out_dir)?;

    let compositor = Compositor::new(&magick, &theme, &branding);
    let mut sequence = FrameSequence::new(&out_dir, &compositor)?;
    sequence.emit_all(&trailer_storyboard(&analysis, &super::generated_at()))?;
    let frames = sequence.into_frames();

    let gif = out_dir.join("trailer.gif");
    GifEncoder::new(&magick).encode(
        &EncodeJob {
            frames: frames.clone(),
            output: gif.clone(),
            frame_seconds: slide_seconds,
            fps,
        },
        None,
    )?;
    println!("✓ Wrote {}", gif.display());

    let mp4 = out_dir.join("trailer.mp4");
    let progress = super::progress_printer();
    let printed_progress = progress.is_some();
    ffmpeg.encode(
        &EncodeJob {
            frames,
            output: mp4.clone(),
            frame_seconds: slide_seconds,
            fps,
        },
        progress,
    )?;
    if printed_progress {
        eprintln!();
    }
    println!("✓ Wrote {}", mp4.display());
    Ok(())
}
