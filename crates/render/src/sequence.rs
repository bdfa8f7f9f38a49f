//! Numbered frame output.

use std::path::{Path, PathBuf};

use cinema_common::error::CinemaResult;
use cinema_model::frame::{frame_file_name, is_frame_file_name, Frame};

/// Anything that can turn a frame into an image file.
pub trait FrameRenderer {
    fn render(&self, frame: &Frame, out: &Path) -> CinemaResult<()>;
}

impl<T: FrameRenderer + ?Sized> FrameRenderer for &T {
    fn render(&self, frame: &Frame, out: &Path) -> CinemaResult<()> {
        (**self).render(frame, out)
    }
}

/// Owns an output directory and the frame counter.
///
/// Frames are numbered from 1 in emission order and each number is used
/// once. A render failure leaves the counter where it was.
pub struct FrameSequence<R> {
    out_dir: PathBuf,
    renderer: R,
    written: Vec<PathBuf>,
}

impl<R: FrameRenderer> FrameSequence<R> {
    /// Start a sequence in `out_dir`, creating it if needed.
    pub fn new(out_dir: impl Into<PathBuf>, renderer: R) -> CinemaResult<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self {
            out_dir,
            renderer,
            written: Vec::new(),
        })
    }

    /// Render `frame` as the next numbered file and return its number.
    pub fn emit(&mut self, frame: &Frame) -> CinemaResult<u32> {
        let number = self.written.len() as u32 + 1;
        let path = self.out_dir.join(frame_file_name(number));
        self.renderer.render(frame, &path)?;
        tracing::debug!(frame = number, kind = frame.kind(), path = %path.display(), "Frame written");
        self.written.push(path);
        Ok(number)
    }

    pub fn emit_all<'f>(&mut self, frames: impl IntoIterator<Item = &'f Frame>) -> CinemaResult<()> {
        for frame in frames {
            self.emit(frame)?;
        }
        Ok(())
    }

    /// Paths written so far, in frame order.
    pub fn frames(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    pub fn into_frames(self) -> Vec<PathBuf> {
        self.written
    }
}

/// Remove leftover `frame_NNNN.png` files so a new run starts clean.
/// Returns how many were removed. A missing directory is not an error.
pub fn clear_stale_frames(dir: &Path) -> CinemaResult<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_str().is_some_and(is_frame_file_name) && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    if removed > 0 {
        tracing::debug!(dir = %dir.display(), removed, "Removed stale frames");
    }
    Ok(removed)
}
