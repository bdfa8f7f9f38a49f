//! Flag groups shared by several commands.

use std::path::PathBuf;

use clap::Args;

use cinema_history::RangeRequest;
use cinema_model::branding::{Anchor, Branding, Gravity, LogoOverlay, Offset, Watermark};
use cinema_model::theme::ThemeSource;

/// Commit range selection.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// From the latest tag (or the root commit) to HEAD
    #[arg(long)]
    pub auto: bool,

    /// Start of the range (requires --to)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the range (requires --from)
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    pub fn request(&self) -> RangeRequest {
        RangeRequest::from_flags(self.auto, self.from.clone(), self.to.clone())
    }
}

/// Theme and branding flags.
#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Theme file path or name under the themes directory
    #[arg(long)]
    pub theme: Option<String>,

    /// Override a theme key, e.g. --set typography.titlePt=72 (repeatable)
    #[arg(long, value_name = "KEY.PATH=VALUE")]
    pub set: Vec<String>,

    /// Canvas preset: hd, youtube, instagram, story, twitter
    #[arg(long)]
    pub preset: Option<String>,

    /// Logo image composited onto every frame
    #[arg(long)]
    pub brand: Option<PathBuf>,

    /// Logo opacity, 0 to 1
    #[arg(long, default_value = "0.85")]
    pub brand_opacity: f64,

    #[arg(long, default_value = "southeast")]
    pub brand_gravity: Gravity,

    #[arg(long, default_value = "+24+24", allow_hyphen_values = true)]
    pub brand_geom: Offset,

    /// Maximum logo width in pixels
    #[arg(long, default_value = "160")]
    pub brand_maxw: u32,

    /// Watermark text composited onto every frame
    #[arg(long)]
    pub watermark: Option<String>,

    #[arg(long, default_value = "18")]
    pub watermark_pt: u32,

    #[arg(long, default_value = "southwest")]
    pub watermark_gravity: Gravity,

    #[arg(long, default_value = "+24+24", allow_hyphen_values = true)]
    pub watermark_geom: Offset,

    #[arg(long, default_value = "#ffffff88")]
    pub watermark_fill: String,
}

impl StyleArgs {
    pub fn theme_source(&self) -> ThemeSource {
        ThemeSource {
            theme: self.theme.clone(),
            preset: self.preset.clone(),
            overrides: self.set.clone(),
        }
    }

    pub fn branding(&self) -> Branding {
        Branding {
            logo: self.brand.as_ref().map(|path| {
                LogoOverlay::new(
                    path,
                    self.brand_opacity,
                    self.brand_maxw,
                    Anchor::new(self.brand_gravity, self.brand_geom),
                )
            }),
            watermark: self
                .watermark
                .as_ref()
                .filter(|text| !text.is_empty())
                .map(|text| Watermark {
                    text: text.clone(),
                    point_size: self.watermark_pt.max(1),
                    fill: self.watermark_fill.clone(),
                    anchor: Anchor::new(self.watermark_gravity, self.watermark_geom),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        style: StyleArgs,
        #[command(flatten)]
        range: RangeArgs,
    }

    fn harness(args: &[&str]) -> Harness {
        Harness::try_parse_from(std::iter::once("t").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_branding_by_default() {
        assert!(harness(&[]).style.branding().is_empty());
    }

    #[test]
    fn test_brand_opacity_is_clamped() {
        let h = harness(&["--brand", "logo.png", "--brand-opacity", "3"]);
        let logo = h.style.branding().logo.unwrap();
        assert_eq!(logo.opacity, 1.0);
        assert_eq!(logo.anchor, Anchor::new(Gravity::SouthEast, Offset::new(24, 24)));
    }

    #[test]
    fn test_watermark_anchor() {
        let h = harness(&["--watermark", "acme", "--watermark-gravity", "north-east"]);
        let watermark = h.style.branding().watermark.unwrap();
        assert_eq!(watermark.text, "acme");
        assert_eq!(watermark.anchor.gravity, Gravity::NorthEast);
        assert_eq!(watermark.point_size, 18);
    }

    #[test]
    fn test_range_request() {
        let h = harness(&["--from", "v1", "--to", "v2"]);
        assert_eq!(
            h.range.request(),
            RangeRequest::Explicit {
                from: Some("v1".into()),
                to: Some("v2".into())
            }
        );
        assert_eq!(harness(&["--auto"]).range.request(), RangeRequest::Auto);
    }

    #[test]
    fn test_theme_source_keeps_override_order() {
        let h = harness(&["--theme", "neon", "--set", "a=1", "--set", "b=2"]);
        let source = h.style.theme_source();
        assert_eq!(source.theme.as_deref(), Some("neon"));
        assert_eq!(source.overrides, vec!["a=1", "b=2"]);
    }
}
