//! Release Cinema Layout: the card auto-fit engine and storyboards
//!
//! - **Auto-fit:** Measure title and body text, shrink point sizes until
//!   the card fits the canvas, and place every block
//! - **Storyboards:** The fixed frame lists for the trailer and the CLI
//!   typing simulation
//!
//! This crate is pure computation. Text measurement is reached through the
//! [`fit::TextMeasurer`] trait; the crate never assumes a rasterizer.

pub mod fit;
pub mod storyboard;

pub use fit::{layout_card, LayoutSolution, TextMeasurer, TextRequest};
pub use storyboard::{simulation_storyboard, trailer_storyboard, typing_frames};
