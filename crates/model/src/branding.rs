//! Branding overlays applied to every frame after base composition.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logo and watermark settings. Both are optional and independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub logo: Option<LogoOverlay>,
    pub watermark: Option<Watermark>,
}

/// A logo image composited onto each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoOverlay {
    pub path: PathBuf,
    /// Alpha multiplier in `[0.0, 1.0]`.
    pub opacity: f64,
    /// The logo is shrunk to at most this width (never enlarged).
    pub max_width: u32,
    pub anchor: Anchor,
}

/// A line of text composited onto each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watermark {
    pub text: String,
    pub point_size: u32,
    pub fill: String,
    pub anchor: Anchor,
}

/// Where an overlay sits: a corner/edge gravity plus a pixel offset
/// measured inward from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub gravity: Gravity,
    pub offset: Offset,
}

/// ImageMagick gravity names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

/// A `+x+y` geometry offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Branding {
    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.watermark.is_none()
    }
}

impl LogoOverlay {
    pub fn new(path: impl Into<PathBuf>, opacity: f64, max_width: u32, anchor: Anchor) -> Self {
        Self {
            path: path.into(),
            opacity: opacity.clamp(0.0, 1.0),
            max_width: max_width.max(1),
            anchor,
        }
    }
}

impl Anchor {
    pub fn new(gravity: Gravity, offset: Offset) -> Self {
        Self { gravity, offset }
    }
}

impl Gravity {
    pub const ALL: [Gravity; 9] = [
        Gravity::NorthWest,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::West,
        Gravity::Center,
        Gravity::East,
        Gravity::SouthWest,
        Gravity::South,
        Gravity::SouthEast,
    ];

    /// Name as ImageMagick's `-gravity` expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            Gravity::NorthWest => "northwest",
            Gravity::North => "north",
            Gravity::NorthEast => "northeast",
            Gravity::West => "west",
            Gravity::Center => "center",
            Gravity::East => "east",
            Gravity::SouthWest => "southwest",
            Gravity::South => "south",
            Gravity::SouthEast => "southeast",
        }
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gravity {
    type Err = BrandingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        Gravity::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| BrandingParseError::Gravity(s.to_string()))
    }
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}{:+}", self.x, self.y)
    }
}

impl FromStr for Offset {
    type Err = BrandingParseError;

    /// Parse `+x+y`, `-x+y`, etc. A bare `x+y` is read as `+x+y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BrandingParseError::Offset(s.to_string());
        let trimmed = s.trim();
        let body = match trimmed.chars().next() {
            Some('+') | Some('-') => trimmed,
            Some(_) => return Self::from_str(&format!("+{trimmed}")),
            None => return Err(err()),
        };

        // Split at the second sign.
        let split = body[1..]
            .find(['+', '-'])
            .map(|i| i + 1)
            .ok_or_else(err)?;
        let (x, y) = body.split_at(split);
        Ok(Offset {
            x: x.parse().map_err(|_| err())?,
            y: y.parse().map_err(|_| err())?,
        })
    }
}

/// Invalid gravity or geometry text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrandingParseError {
    #[error("Unknown gravity '{0}' (use northwest, north, northeast, west, center, east, southwest, south, southeast)")]
    Gravity(String),

    #[error("Invalid geometry offset '{0}' (expected +x+y)")]
    Offset(String),
}
