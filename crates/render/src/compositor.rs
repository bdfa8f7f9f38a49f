//! Frame compositor: background, card, text, and branding layers.
//!
//! Each call writes exactly one image. Intermediate layers live in a
//! per-frame temporary directory that is removed when the call returns,
//! whether or not it succeeded.

use std::path::{Path, PathBuf};

use cinema_common::error::{CinemaError, CinemaResult};
use cinema_layout::fit::{layout_card, LayoutSolution, TextMeasurer};
use cinema_model::branding::{Branding, Gravity, LogoOverlay, Offset, Watermark};
use cinema_model::frame::{CardFrame, Frame, TtyFrame};
use cinema_model::theme::Theme;

use crate::magick::{CardShape, Magick, TextLayer};
use crate::sequence::FrameRenderer;

/// Monospace size on terminal frames.
pub const TTY_POINT_SIZE: u32 = 28;
/// Inset of the terminal text from the top-left corner.
pub const TTY_INSET: Offset = Offset { x: 40, y: 40 };
/// Horizontal room left beside terminal text.
pub const TTY_SIDE_MARGIN: u32 = 80;

/// Image operations the compositor layers frames with. Each writes one
/// image to `out`.
pub trait Rasterizer: TextMeasurer {
    fn canvas(&self, width: u32, height: u32, color: &str, out: &Path) -> CinemaResult<()>;

    fn rounded_card(&self, card: &CardShape<'_>, out: &Path) -> CinemaResult<()>;

    fn text(&self, layer: &TextLayer<'_>, out: &Path) -> CinemaResult<()>;

    fn label(&self, text: &str, font: &str, point_size: u32, fill: &str, out: &Path) -> CinemaResult<()>;

    fn fit_logo(&self, src: &Path, max_width: u32, opacity: f64, out: &Path) -> CinemaResult<()>;

    /// Place `overlay` on `base` at `gravity` plus `offset`.
    fn composite(
        &self,
        base: &Path,
        overlay: &Path,
        gravity: Gravity,
        offset: Option<Offset>,
        out: &Path,
    ) -> CinemaResult<()>;
}

/// Renders frames with one theme and branding.
pub struct Compositor<'a, R: Rasterizer = Magick> {
    raster: &'a R,
    theme: &'a Theme,
    branding: &'a Branding,
    logo_available: bool,
}

impl<'a, R: Rasterizer> Compositor<'a, R> {
    pub fn new(raster: &'a R, theme: &'a Theme, branding: &'a Branding) -> Self {
        let logo_available = match &branding.logo {
            Some(logo) if logo.path.is_file() => true,
            Some(logo) => {
                tracing::warn!(path = %logo.path.display(), "Logo not found; skipping");
                false
            }
            None => false,
        };
        Self {
            raster,
            theme,
            branding,
            logo_available,
        }
    }

    pub fn compose(&self, frame: &Frame, out: &Path) -> CinemaResult<()> {
        match frame {
            Frame::Card(card) => self.compose_card(card, out).map(drop),
            Frame::Tty(tty) => self.compose_tty(tty, out),
        }
    }

    /// Lay out and render a card frame.
    pub fn compose_card(&self, card: &CardFrame, out: &Path) -> CinemaResult<LayoutSolution> {
        let theme = self.theme;
        let body = card.body_text();
        let solution = layout_card(theme, &card.title, &card.body, self.raster)?;

        let mut layers = Layers::new()?;

        let base = layers.next_path();
        self.raster
            .canvas(theme.width, theme.height, &theme.bg, &base)?;
        layers.advance(base);

        let card_png = layers.scratch("card.png");
        let fill = theme.card_fill();
        self.raster.rounded_card(
            &CardShape {
                width: solution.card_width,
                height: solution.card_height,
                radius: theme.card.radius,
                fill: &fill,
                stroke: &theme.card.stroke,
            },
            &card_png,
        )?;
        layers.overlay(self.raster, &card_png, Gravity::Center, None)?;

        if !card.title.is_empty() {
            let title_png = layers.scratch("title.png");
            self.raster.text(
                &TextLayer {
                    text: &card.title,
                    font: &theme.sans,
                    point_size: solution.title_pt,
                    fill: &theme.accent,
                    max_width: solution.text_width,
                },
                &title_png,
            )?;
            layers.overlay(
                self.raster,
                &title_png,
                Gravity::North,
                Some(below_top(solution.title_y)),
            )?;
        }

        if !body.is_empty() {
            let body_png = layers.scratch("body.png");
            self.raster.text(
                &TextLayer {
                    text: &body,
                    font: &theme.sans,
                    point_size: solution.body_pt,
                    fill: &theme.fg,
                    max_width: solution.text_width,
                },
                &body_png,
            )?;
            layers.overlay(
                self.raster,
                &body_png,
                Gravity::North,
                Some(below_top(solution.body_y)),
            )?;
        }

        self.brand(&mut layers)?;
        layers.finish(out)?;
        Ok(solution)
    }

    /// Render a terminal frame.
    pub fn compose_tty(&self, tty: &TtyFrame, out: &Path) -> CinemaResult<()> {
        let theme = self.theme;
        let mut layers = Layers::new()?;

        let base = layers.next_path();
        self.raster
            .canvas(theme.width, theme.height, &theme.bg, &base)?;
        layers.advance(base);

        if !tty.text.is_empty() {
            let text_png = layers.scratch("tty.png");
            self.raster.text(
                &TextLayer {
                    text: &tty.text,
                    font: &theme.mono,
                    point_size: TTY_POINT_SIZE,
                    fill: &theme.fg,
                    max_width: theme.width.saturating_sub(TTY_SIDE_MARGIN).max(1),
                },
                &text_png,
            )?;
            layers.overlay(self.raster, &text_png, Gravity::NorthWest, Some(TTY_INSET))?;
        }

        self.brand(&mut layers)?;
        layers.finish(out)
    }

    fn brand(&self, layers: &mut Layers) -> CinemaResult<()> {
        if let Some(logo) = self.branding.logo.as_ref().filter(|_| self.logo_available) {
            self.apply_logo(logo, layers)?;
        }
        if let Some(watermark) = &self.branding.watermark {
            self.apply_watermark(watermark, layers)?;
        }
        Ok(())
    }

    fn apply_logo(&self, logo: &LogoOverlay, layers: &mut Layers) -> CinemaResult<()> {
        let fitted = layers.scratch("logo.png");
        self.raster
            .fit_logo(&logo.path, logo.max_width, logo.opacity, &fitted)?;
        layers.overlay(
            self.raster,
            &fitted,
            logo.anchor.gravity,
            Some(logo.anchor.offset),
        )
    }

    fn apply_watermark(&self, watermark: &Watermark, layers: &mut Layers) -> CinemaResult<()> {
        if watermark.text.is_empty() {
            return Ok(());
        }
        let label = layers.scratch("watermark.png");
        self.raster.label(
            &watermark.text,
            &self.theme.sans,
            watermark.point_size,
            &watermark.fill,
            &label,
        )?;
        layers.overlay(
            self.raster,
            &label,
            watermark.anchor.gravity,
            Some(watermark.anchor.offset),
        )
    }
}

impl<R: Rasterizer> FrameRenderer for Compositor<'_, R> {
    fn render(&self, frame: &Frame, out: &Path) -> CinemaResult<()> {
        self.compose(frame, out)
    }
}

/// North-gravity offset for a row `y` pixels below the top edge.
fn below_top(y: u32) -> Offset {
    Offset::new(0, i32::try_from(y).unwrap_or(i32::MAX))
}

/// Scratch space for one frame's intermediate images.
struct Layers {
    dir: tempfile::TempDir,
    stage: u32,
    current: Option<PathBuf>,
}

impl Layers {
    fn new() -> CinemaResult<Self> {
        let dir = tempfile::Builder::new().prefix("rc-").tempdir()?;
        Ok(Self {
            dir,
            stage: 0,
            current: None,
        })
    }

    fn scratch(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn next_path(&mut self) -> PathBuf {
        self.stage += 1;
        self.dir.path().join(format!("stage{}.png", self.stage))
    }

    fn advance(&mut self, path: PathBuf) {
        self.current = Some(path);
    }

    /// Composite `overlay` onto the current stage.
    fn overlay(
        &mut self,
        raster: &impl Rasterizer,
        overlay: &Path,
        gravity: Gravity,
        offset: Option<Offset>,
    ) -> CinemaResult<()> {
        let base = self.current_stage()?;
        let next = self.next_path();
        raster.composite(&base, overlay, gravity, offset, &next)?;
        self.advance(next);
        Ok(())
    }

    fn current_stage(&self) -> CinemaResult<PathBuf> {
        self.current
            .clone()
            .ok_or_else(|| CinemaError::render("No base layer to composite onto"))
    }

    /// Copy the last stage to `out`; the scratch directory goes away on drop.
    fn finish(self, out: &Path) -> CinemaResult<()> {
        let last = self.current_stage()?;
        std::fs::copy(&last, out)?;
        tracing::trace!(out = %out.display(), stages = self.stage, "Frame composed");
        Ok(())
    }
}
