//! Release Cinema Render
//!
//! Turns storyboard frames into images and images into artifacts.
//!
//! # Pipeline
//!
//! ```text
//! Frame ──┐
//!         ├── layout_card (cards only, measured through ImageMagick)
//! Theme ──┘         │
//!                   ├── background + card + title + body  (Compositor)
//! Branding ─────────┘         │
//!                             ├── logo / watermark pass
//!                             ▼
//!                      frame_NNNN.png  (FrameSequence)
//!                             │
//!                 ┌───────────┴───────────┐
//!                 ▼                       ▼
//!           GIF (ImageMagick)       MP4 (ffmpeg)
//! ```

pub mod compositor;
pub mod export;
pub mod magick;
pub mod sequence;

pub use compositor::{Compositor, Rasterizer};
pub use export::{
    EncodeBackend, EncodeJob, ExportProgress, ExportStage, FfmpegEncoder, GifEncoder,
    ProgressCallback,
};
pub use magick::Magick;
pub use sequence::{clear_stale_frames, FrameRenderer, FrameSequence};
