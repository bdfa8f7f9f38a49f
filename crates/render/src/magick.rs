//! ImageMagick backend.
//!
//! Every operation is a pure argument builder plus a thin method that runs
//! it. Arguments use the classic `convert` syntax, which both `magick`
//! (v7) and `convert` (v6) accept.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use cinema_common::error::{CinemaError, CinemaResult};
use cinema_common::process::{find_tool, require_tool, Invocation};
use cinema_layout::fit::{TextMeasurer, TextRequest};
use cinema_model::branding::{Gravity, Offset};

use crate::compositor::Rasterizer;

const INSTALL_HINT: &str = "Install ImageMagick (provides `magick` or `convert`).";

/// A text block rasterized with `caption:` (wrapped to a width).
#[derive(Debug, Clone, Copy)]
pub struct TextLayer<'a> {
    pub text: &'a str,
    pub font: &'a str,
    pub point_size: u32,
    pub fill: &'a str,
    pub max_width: u32,
}

/// Handle on an installed ImageMagick binary.
#[derive(Debug, Clone)]
pub struct Magick {
    program: PathBuf,
}

impl Magick {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `preferred` when configured, otherwise `magick`, then `convert`.
    pub fn detect(preferred: Option<&str>) -> CinemaResult<Self> {
        if let Some(binary) = preferred {
            return require_tool(binary, INSTALL_HINT).map(Self::new);
        }
        find_tool("magick")
            .or_else(|| find_tool("convert"))
            .map(Self::new)
            .ok_or_else(|| CinemaError::environment(format!("ImageMagick not found. {INSTALL_HINT}")))
    }

    pub fn run(&self, args: Vec<OsString>) -> CinemaResult<String> {
        Invocation::new(&self.program).args(args).run()
    }

    /// Animated, looping GIF from `frames` in the given order.
    pub fn assemble_gif(&self, frames: &[PathBuf], delay_cs: u32, out: &Path) -> CinemaResult<()> {
        self.run(gif_args(frames, delay_cs, out)).map(drop)
    }
}

impl TextMeasurer for Magick {
    fn measure(&self, request: &TextRequest<'_>) -> CinemaResult<u32> {
        let out = self.run(measure_args(request))?;
        parse_height(&out).ok_or_else(|| {
            CinemaError::render(format!("Unexpected text measurement output: {out:?}"))
        })
    }
}

impl Rasterizer for Magick {
    fn canvas(&self, width: u32, height: u32, color: &str, out: &Path) -> CinemaResult<()> {
        self.run(canvas_args(width, height, color, out)).map(drop)
    }

    fn rounded_card(&self, card: &CardShape<'_>, out: &Path) -> CinemaResult<()> {
        self.run(card_args(card, out)).map(drop)
    }

    fn text(&self, layer: &TextLayer<'_>, out: &Path) -> CinemaResult<()> {
        self.run(text_layer_args(layer, out)).map(drop)
    }

    fn label(&self, text: &str, font: &str, point_size: u32, fill: &str, out: &Path) -> CinemaResult<()> {
        self.run(label_args(text, font, point_size, fill, out)).map(drop)
    }

    fn fit_logo(&self, src: &Path, max_width: u32, opacity: f64, out: &Path) -> CinemaResult<()> {
        self.run(logo_args(src, max_width, opacity, out)).map(drop)
    }

    fn composite(
        &self,
        base: &Path,
        overlay: &Path,
        gravity: Gravity,
        offset: Option<Offset>,
        out: &Path,
    ) -> CinemaResult<()> {
        self.run(composite_args(base, overlay, gravity, offset, out))
            .map(drop)
    }
}

/// Geometry of the translucent card.
#[derive(Debug, Clone, Copy)]
pub struct CardShape<'a> {
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    pub fill: &'a str,
    pub stroke: &'a str,
}

/// Escape text for ImageMagick's own interpretation: `\` escapes the next
/// character, `%` starts a format escape, and a leading `@` reads the text
/// from a file.
pub fn escape_caption(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('%', "%%");
    match escaped.strip_prefix('@') {
        Some(rest) => format!("\\@{rest}"),
        None => escaped,
    }
}

fn os(value: impl AsRef<OsStr>) -> OsString {
    value.as_ref().to_os_string()
}

fn parse_height(output: &str) -> Option<u32> {
    output.lines().next()?.trim().parse().ok()
}

pub fn measure_args(request: &TextRequest<'_>) -> Vec<OsString> {
    vec![
        os("-background"),
        os("none"),
        os("-font"),
        os(request.font),
        os("-pointsize"),
        os(request.point_size.to_string()),
        os("-size"),
        os(format!("{}x", request.max_width)),
        os(format!("caption:{}", escape_caption(request.text))),
        os("-format"),
        os("%h"),
        os("info:"),
    ]
}

pub fn canvas_args(width: u32, height: u32, color: &str, out: &Path) -> Vec<OsString> {
    vec![
        os("-size"),
        os(format!("{width}x{height}")),
        os(format!("xc:{color}")),
        os(out),
    ]
}

/// The card is drawn twice: filled at full size, then inset by one pixel
/// with a 2px stroke.
pub fn card_args(card: &CardShape<'_>, out: &Path) -> Vec<OsString> {
    let r = card.radius;
    let outer = format!(
        "roundrectangle 0,0 {},{} {r},{r}",
        card.width.saturating_sub(1),
        card.height.saturating_sub(1)
    );
    let inner = format!(
        "roundrectangle 1,1 {},{} {r},{r}",
        card.width.saturating_sub(2),
        card.height.saturating_sub(2)
    );
    vec![
        os("-size"),
        os(format!("{}x{}", card.width, card.height)),
        os("xc:none"),
        os("-fill"),
        os(card.fill),
        os("-draw"),
        os(outer),
        os("-stroke"),
        os(card.stroke),
        os("-strokewidth"),
        os("2"),
        os("-draw"),
        os(inner),
        os(out),
    ]
}

pub fn text_layer_args(layer: &TextLayer<'_>, out: &Path) -> Vec<OsString> {
    vec![
        os("-background"),
        os("none"),
        os("-fill"),
        os(layer.fill),
        os("-font"),
        os(layer.font),
        os("-pointsize"),
        os(layer.point_size.to_string()),
        os("-size"),
        os(format!("{}x", layer.max_width)),
        os(format!("caption:{}", escape_caption(layer.text))),
        os(out),
    ]
}

/// Single-line text at its natural width.
pub fn label_args(text: &str, font: &str, point_size: u32, fill: &str, out: &Path) -> Vec<OsString> {
    vec![
        os("-background"),
        os("none"),
        os("-fill"),
        os(fill),
        os("-font"),
        os(font),
        os("-pointsize"),
        os(point_size.to_string()),
        os(format!("label:{}", escape_caption(text))),
        os(out),
    ]
}

/// Shrink (never enlarge) to `max_width` and scale alpha by `opacity`.
pub fn logo_args(src: &Path, max_width: u32, opacity: f64, out: &Path) -> Vec<OsString> {
    vec![
        os(src),
        os("-resize"),
        os(format!("{max_width}x>")),
        os("-alpha"),
        os("set"),
        os("-channel"),
        os("A"),
        os("-evaluate"),
        os("multiply"),
        os(format!("{:.3}", opacity.clamp(0.0, 1.0))),
        os("+channel"),
        os(out),
    ]
}

pub fn composite_args(
    base: &Path,
    overlay: &Path,
    gravity: Gravity,
    offset: Option<Offset>,
    out: &Path,
) -> Vec<OsString> {
    let mut args = vec![os(base), os(overlay), os("-gravity"), os(gravity.as_str())];
    if let Some(offset) = offset {
        args.push(os("-geometry"));
        args.push(os(offset.to_string()));
    }
    args.push(os("-composite"));
    args.push(os(out));
    args
}

pub fn gif_args(frames: &[PathBuf], delay_cs: u32, out: &Path) -> Vec<OsString> {
    let mut args = vec![
        os("-delay"),
        os(delay_cs.to_string()),
        os("-loop"),
        os("0"),
    ];
    args.extend(frames.iter().map(os));
    args.push(os(out));
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_escape_caption() {
        assert_eq!(escape_caption("100% done"), "100%% done");
        assert_eq!(escape_caption("@etc/passwd"), "\\@etc/passwd");
        assert_eq!(escape_caption("mail me @ home"), "mail me @ home");
        assert_eq!(escape_caption("$HOME `x` \"q\""), "$HOME `x` \"q\"");
    }

    #[test]
    fn test_escape_caption_doubles_backslashes() {
        assert_eq!(escape_caption(r"C:\new\n"), r"C:\\new\\n");
        assert_eq!(escape_caption(r"\@home"), r"\\@home");
        assert_eq!(escape_caption(r"@\n"), r"\@\\n");
        assert_eq!(
            label_args("a\\b", "DejaVu-Sans", 12, "#fff", Path::new("l.png"))[8],
            OsString::from(r"label:a\\b")
        );
    }

    #[test]
    fn test_measure_args() {
        let args = measure_args(&TextRequest {
            text: "HIGHLIGHTS",
            font: "DejaVu-Sans",
            point_size: 64,
            max_width: 858,
        });
        assert_eq!(
            strings(&args),
            vec![
                "-background",
                "none",
                "-font",
                "DejaVu-Sans",
                "-pointsize",
                "64",
                "-size",
                "858x",
                "caption:HIGHLIGHTS",
                "-format",
                "%h",
                "info:",
            ]
        );
    }

    #[test]
    fn test_parse_height() {
        assert_eq!(parse_height("77\n"), Some(77));
        assert_eq!(parse_height(" 120 "), Some(120));
        assert_eq!(parse_height("77\n80"), Some(77));
        assert_eq!(parse_height(""), None);
        assert_eq!(parse_height("abc"), None);
    }

    #[test]
    fn test_card_args_draw_outline_inset() {
        let card = CardShape {
            width: 998,
            height: 288,
            radius: 36,
            fill: "rgba(255,255,255,0.06)",
            stroke: "#7aa2f744",
        };
        let args = strings(&card_args(&card, Path::new("card.png")));
        assert_eq!(args[1], "998x288");
        assert_eq!(args[6], "roundrectangle 0,0 997,287 36,36");
        assert_eq!(args[12], "roundrectangle 1,1 996,286 36,36");
        assert_eq!(args.last().unwrap(), "card.png");
    }

    #[test]
    fn test_composite_args_geometry_optional() {
        let centered = composite_args(
            Path::new("a.png"),
            Path::new("b.png"),
            Gravity::Center,
            None,
            Path::new("c.png"),
        );
        assert_eq!(
            strings(&centered),
            vec!["a.png", "b.png", "-gravity", "center", "-composite", "c.png"]
        );

        let placed = composite_args(
            Path::new("a.png"),
            Path::new("b.png"),
            Gravity::North,
            Some(Offset { x: 0, y: 258 }),
            Path::new("c.png"),
        );
        assert_eq!(strings(&placed)[4..6], ["-geometry", "+0+258"]);
    }

    #[test]
    fn test_logo_args_never_enlarge() {
        let args = strings(&logo_args(Path::new("logo.png"), 160, 0.85, Path::new("l.png")));
        assert_eq!(args[2], "160x>");
        assert_eq!(args[9], "0.850");
    }

    #[test]
    fn test_gif_args_keep_frame_order() {
        let frames = vec![PathBuf::from("frame_0002.png"), PathBuf::from("frame_0001.png")];
        let args = strings(&gif_args(&frames, 300, Path::new("out.gif")));
        assert_eq!(
            args,
            vec!["-delay", "300", "-loop", "0", "frame_0002.png", "frame_0001.png", "out.gif"]
        );
    }

    #[test]
    fn test_detect_with_missing_override_fails() {
        let err = Magick::detect(Some("release-cinema-no-such-magick")).unwrap_err();
        assert!(matches!(err, CinemaError::Environment { .. }));
    }
}
