//! Release Cinema Model
//!
//! Defines the data contracts shared by every stage of the pipeline:
//! - **Theme:** Colors, fonts, canvas, card, spacing, and typography,
//!   resolved once per invocation from layered sources
//! - **Preset:** Named canvas sizes with a uniform scale factor
//! - **Analysis:** The JSON summary of a commit range
//! - **Frame:** Card and TTY frames addressed by sequence number
//! - **Branding:** Logo and watermark overlays applied to every frame

pub mod analysis;
pub mod branding;
pub mod frame;
pub mod preset;
pub mod theme;

pub use analysis::*;
pub use branding::*;
pub use frame::*;
pub use preset::*;
pub use theme::*;
