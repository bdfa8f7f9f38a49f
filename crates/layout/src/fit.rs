//! Auto-fit card layout.
//!
//! A card holds a title block above a body block. Both are measured at the
//! theme's point sizes; while the card would be taller than the canvas
//! allows, the body shrinks by 2pt (floor 20) and the title by 4% (floor
//! 36), for at most [`MAX_SHRINK_ATTEMPTS`] rounds.
//!
//! Content that still overflows after the last round is laid out anyway at
//! the smallest sizes reached. The card is then clamped to the maximum
//! height and text may clip. This is a best-effort fit, reported through
//! [`LayoutSolution::overflow`], never an error.

use cinema_common::error::CinemaResult;
use cinema_model::theme::Theme;

/// Card width as a fraction of the canvas width.
pub const CARD_WIDTH_RATIO: f64 = 0.78;
/// Horizontal space inside the card reserved around the text blocks.
pub const TEXT_SIDE_PADDING: u32 = 140;
/// Smallest card height as a fraction of the canvas height.
pub const MIN_CARD_HEIGHT_RATIO: f64 = 0.40;

pub const MAX_SHRINK_ATTEMPTS: u32 = 12;
pub const BODY_SHRINK_STEP: u32 = 2;
pub const MIN_BODY_PT: u32 = 20;
pub const TITLE_SHRINK_FACTOR: f64 = 0.96;
pub const MIN_TITLE_PT: u32 = 36;

/// A block of text to be measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRequest<'a> {
    pub text: &'a str,
    pub font: &'a str,
    pub point_size: u32,
    /// Wrap width in pixels.
    pub max_width: u32,
}

/// Reports the rendered height of a text block.
///
/// Implementations may rasterize through any backend. They are never
/// asked to measure empty text.
pub trait TextMeasurer {
    /// Rendered height in pixels.
    fn measure(&self, request: &TextRequest<'_>) -> CinemaResult<u32>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, request: &TextRequest<'_>) -> CinemaResult<u32> {
        (**self).measure(request)
    }
}

/// Size limits derived from the theme alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardGeometry {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub card_width: u32,
    /// Wrap width for title and body.
    pub text_width: u32,
    pub max_card_height: u32,
    pub min_card_height: u32,
}

impl CardGeometry {
    pub fn for_theme(theme: &Theme) -> Self {
        let max_card_height = theme
            .height
            .saturating_sub(theme.spacing.margin.saturating_mul(2));
        let min_card_height =
            ((theme.height as f64 * MIN_CARD_HEIGHT_RATIO).round() as u32).min(max_card_height);
        let card_width = (theme.width as f64 * CARD_WIDTH_RATIO).round() as u32;

        Self {
            canvas_width: theme.width,
            canvas_height: theme.height,
            card_width,
            text_width: card_width.saturating_sub(TEXT_SIDE_PADDING).max(1),
            max_card_height,
            min_card_height,
        }
    }
}

/// The solved layout for one card frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSolution {
    pub title_pt: u32,
    pub body_pt: u32,
    pub title_height: u32,
    pub body_height: u32,
    pub card_width: u32,
    pub card_height: u32,
    pub text_width: u32,
    /// Top edge of the card on the canvas.
    pub card_top: u32,
    /// Top edge of the title block on the canvas.
    pub title_y: u32,
    /// Top edge of the body block on the canvas.
    pub body_y: u32,
    /// Shrink rounds performed.
    pub attempts: u32,
    /// Content is taller than the card even at the final sizes.
    pub overflow: bool,
}

/// Next body size: 2pt smaller, floor 20, never larger than `pt`.
pub fn shrink_body_pt(pt: u32) -> u32 {
    pt.saturating_sub(BODY_SHRINK_STEP).max(MIN_BODY_PT).min(pt)
}

/// Next title size: 4% smaller (rounded), floor 36, never larger than `pt`.
pub fn shrink_title_pt(pt: u32) -> u32 {
    ((pt as f64 * TITLE_SHRINK_FACTOR).round() as u32)
        .max(MIN_TITLE_PT)
        .min(pt)
}

/// Lay out a card, shrinking type until the content fits.
pub fn layout_card<S, M>(
    theme: &Theme,
    title: &str,
    body_lines: &[S],
    measurer: &M,
) -> CinemaResult<LayoutSolution>
where
    S: AsRef<str>,
    M: TextMeasurer + ?Sized,
{
    let geometry = CardGeometry::for_theme(theme);
    let body = body_lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    let measure = |text: &str, point_size: u32| -> CinemaResult<u32> {
        if text.is_empty() {
            return Ok(0);
        }
        measurer.measure(&TextRequest {
            text,
            font: &theme.sans,
            point_size,
            max_width: geometry.text_width,
        })
    };
    let spacing = &theme.spacing;
    let needed = |title_h: u32, body_h: u32| {
        spacing
            .pad_top
            .saturating_add(title_h)
            .saturating_add(spacing.gap_title_body)
            .saturating_add(body_h)
            .saturating_add(spacing.pad_bottom)
    };

    let mut title_pt = theme.typography.title_pt;
    let mut body_pt = theme.typography.body_pt;
    let mut title_height = measure(title, title_pt)?;
    let mut body_height = measure(&body, body_pt)?;
    let mut attempts = 0;

    while needed(title_height, body_height) > geometry.max_card_height
        && attempts < MAX_SHRINK_ATTEMPTS
    {
        let next_title = shrink_title_pt(title_pt);
        let next_body = shrink_body_pt(body_pt);
        if next_title == title_pt && next_body == body_pt {
            // Both floors reached; further rounds would measure the same.
            break;
        }

        attempts += 1;
        title_pt = next_title;
        body_pt = next_body;
        title_height = measure(title, title_pt)?;
        body_height = measure(&body, body_pt)?;

        tracing::trace!(
            attempt = attempts,
            title_pt,
            body_pt,
            needed = needed(title_height, body_height),
            max = geometry.max_card_height,
            "Shrinking card text"
        );
    }

    let total = needed(title_height, body_height);
    let overflow = total > geometry.max_card_height;
    if overflow {
        tracing::warn!(
            title = %title,
            needed = total,
            max = geometry.max_card_height,
            title_pt,
            body_pt,
            "Card content still overflows after shrinking; text may clip"
        );
    }

    let card_height = total.clamp(geometry.min_card_height, geometry.max_card_height);
    let card_top = (geometry.canvas_height.saturating_sub(card_height)) / 2;
    let title_y = card_top.saturating_add(spacing.pad_top);
    let body_y = title_y
        .saturating_add(title_height)
        .saturating_add(spacing.gap_title_body);

    tracing::debug!(
        title = %title,
        title_pt,
        body_pt,
        card_height,
        attempts,
        "Card layout solved"
    );

    Ok(LayoutSolution {
        title_pt,
        body_pt,
        title_height,
        body_height,
        card_width: geometry.card_width,
        card_height,
        text_width: geometry.text_width,
        card_top,
        title_y,
        body_y,
        attempts,
        overflow,
    })
}
