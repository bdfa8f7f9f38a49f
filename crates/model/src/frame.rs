//! Frame contracts.
//!
//! A frame is a single image in an output sequence. Frames are numbered
//! from 1 and written once to `frame_NNNN.png`.

use serde::{Deserialize, Serialize};

/// A frame to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Frame {
    Card(CardFrame),
    Tty(TtyFrame),
}

/// A centered card with a title and body lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFrame {
    pub title: String,
    pub body: Vec<String>,
}

/// A terminal screen: one text block anchored top-left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtyFrame {
    pub text: String,
}

impl Frame {
    pub fn card<S: Into<String>>(title: impl Into<String>, body: impl IntoIterator<Item = S>) -> Self {
        Frame::Card(CardFrame {
            title: title.into(),
            body: body.into_iter().map(Into::into).collect(),
        })
    }

    /// A TTY frame from lines joined with newlines.
    pub fn tty<S: AsRef<str>>(lines: &[S]) -> Self {
        Frame::Tty(TtyFrame {
            text: lines
                .iter()
                .map(|l| l.as_ref())
                .collect::<Vec<_>>()
                .join("\n"),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Card(_) => "card",
            Frame::Tty(_) => "tty",
        }
    }
}

impl CardFrame {
    /// Body lines as one text block.
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }
}

/// Glob-friendly prefix shared by every frame file.
pub const FRAME_PREFIX: &str = "frame_";

/// File name of a frame: `frame_0001.png`.
pub fn frame_file_name(number: u32) -> String {
    format!("{FRAME_PREFIX}{number:04}.png")
}

/// Whether a file name looks like one produced by [`frame_file_name`].
pub fn is_frame_file_name(name: &str) -> bool {
    name.strip_prefix(FRAME_PREFIX)
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
