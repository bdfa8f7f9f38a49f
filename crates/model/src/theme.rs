//! Theme configuration and the layered resolution pipeline.
//!
//! A theme is resolved once per invocation:
//!
//! ```text
//! Theme::default() ─► merge_layer(file) ─► with_preset(preset) ─► with_overrides(--set ...)
//! ```
//!
//! Each step returns a new [`Theme`]; nothing is mutated in place. Merging
//! happens on the JSON form so that theme files and `--set` overrides can
//! address exactly the keys they name.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::preset::Preset;

/// Nested objects merged leaf by leaf instead of being replaced.
const NESTED_SECTIONS: [&str; 3] = ["card", "spacing", "typography"];

/// Effective visual configuration for every frame of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Canvas background color.
    pub bg: String,
    /// Body and terminal text color.
    pub fg: String,
    /// Title color.
    pub accent: String,
    /// Monospace font used for TTY frames.
    pub mono: String,
    /// Proportional font used for cards and watermarks.
    pub sans: String,
    /// Canvas size in pixels.
    pub width: u32,
    pub height: u32,
    pub card: CardStyle,
    pub spacing: Spacing,
    pub typography: Typography,
}

/// Appearance of the rounded card panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStyle {
    /// Corner radius in pixels.
    pub radius: u32,
    /// Opacity of the white card fill, `0.0..=1.0`.
    pub glass: f64,
    /// Outline color (any ImageMagick color string).
    pub stroke: String,
}

/// Vertical spacing inside the canvas and card, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    /// Minimum distance between the card and the canvas edge.
    pub margin: u32,
    pub pad_top: u32,
    pub gap_title_body: u32,
    pub pad_bottom: u32,
}

/// Configured point sizes before any auto-fit shrinking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub title_pt: u32,
    pub body_pt: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: "#0b0f14".to_string(),
            fg: "#e5e9f0".to_string(),
            accent: "#7aa2f7".to_string(),
            mono: "DejaVu-Sans-Mono".to_string(),
            sans: "DejaVu-Sans".to_string(),
            width: 1280,
            height: 720,
            card: CardStyle::default(),
            spacing: Spacing::default(),
            typography: Typography::default(),
        }
    }
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            radius: 36,
            glass: 0.06,
            stroke: "#7aa2f744".to_string(),
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            margin: 64,
            pad_top: 42,
            gap_title_body: 40,
            pad_bottom: 48,
        }
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title_pt: 64,
            body_pt: 34,
        }
    }
}

/// The layered inputs a theme is resolved from.
#[derive(Debug, Clone, Default)]
pub struct ThemeSource {
    /// Theme file path, or a name looked up as `<name>.json` in the themes directory.
    pub theme: Option<String>,
    /// Preset name.
    pub preset: Option<String>,
    /// Raw `path.to.key=value` overrides, applied in order.
    pub overrides: Vec<String>,
}

/// Resolve the effective theme from all layers.
pub fn resolve_theme(source: &ThemeSource, themes_dir: &Path) -> Result<Theme, ThemeError> {
    let mut theme = Theme::default();

    if let Some(name) = &source.theme {
        if let Some(layer) = load_theme_layer(name, themes_dir)? {
            theme = theme.merge_layer(&layer)?;
        }
    }

    if let Some(name) = &source.preset {
        let preset = Preset::from_name(name)?;
        theme = theme.with_preset(&preset);
    }

    let theme = theme.with_overrides(&source.overrides)?;
    tracing::debug!(
        width = theme.width,
        height = theme.height,
        title_pt = theme.typography.title_pt,
        body_pt = theme.typography.body_pt,
        "Theme resolved"
    );
    Ok(theme)
}

impl Theme {
    /// Fill color of the card panel.
    pub fn card_fill(&self) -> String {
        format!("rgba(255,255,255,{})", self.card.glass)
    }

    /// Merge a theme-file layer: top-level keys replace, `card`, `spacing`
    /// and `typography` merge key by key.
    pub fn merge_layer(&self, layer: &Value) -> Result<Theme, ThemeError> {
        let mut base = self.to_json()?;
        merge_sections(&mut base, layer);
        Self::from_json(base)
    }

    /// Apply a preset: canvas size is replaced, spacing, typography and
    /// card radius are scaled.
    pub fn with_preset(&self, preset: &Preset) -> Theme {
        let scale = |v: u32| preset.scale_value(v);
        Theme {
            width: preset.width,
            height: preset.height,
            card: CardStyle {
                radius: scale(self.card.radius),
                ..self.card.clone()
            },
            spacing: Spacing {
                margin: scale(self.spacing.margin),
                pad_top: scale(self.spacing.pad_top),
                gap_title_body: scale(self.spacing.gap_title_body),
                pad_bottom: scale(self.spacing.pad_bottom),
            },
            typography: Typography {
                title_pt: scale(self.typography.title_pt),
                body_pt: scale(self.typography.body_pt),
            },
            ..self.clone()
        }
    }

    /// Apply raw `path.to.key=value` overrides in order.
    pub fn with_overrides<S: AsRef<str>>(&self, overrides: &[S]) -> Result<Theme, ThemeError> {
        if overrides.is_empty() {
            return Ok(self.clone());
        }
        let mut base = self.to_json()?;
        for raw in overrides {
            let parsed: Override = raw.as_ref().parse()?;
            parsed.apply(&mut base);
        }
        Self::from_json(base)
    }

    fn to_json(&self) -> Result<Value, ThemeError> {
        serde_json::to_value(self).map_err(|source| ThemeError::Invalid { source })
    }

    fn from_json(value: Value) -> Result<Theme, ThemeError> {
        serde_json::from_value(value).map_err(|source| ThemeError::Invalid { source })
    }
}

fn merge_sections(base: &mut Value, layer: &Value) {
    let (Some(base), Some(layer)) = (base.as_object_mut(), layer.as_object()) else {
        return;
    };

    for (key, value) in layer {
        let nested = NESTED_SECTIONS.contains(&key.as_str());
        match (base.get_mut(key), value) {
            (Some(Value::Object(current)), Value::Object(leaves)) if nested => {
                for (leaf, leaf_value) in leaves {
                    current.insert(leaf.clone(), leaf_value.clone());
                }
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A single `--set path.to.key=value` override.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub path: Vec<String>,
    pub value: Value,
}

impl FromStr for Override {
    type Err = ThemeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ThemeError::InvalidOverride {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        let (path, value) = raw
            .split_once('=')
            .ok_or_else(|| invalid("expected path.to.key=value"))?;
        let path: Vec<String> = path.trim().split('.').map(str::to_string).collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(invalid("empty key in path"));
        }

        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        Ok(Self { path, value })
    }
}

impl Override {
    /// Write the value at the path, creating intermediate objects.
    pub fn apply(&self, target: &mut Value) {
        let Some((last, parents)) = self.path.split_last() else {
            return;
        };

        let mut node = target;
        for segment in parents {
            node = ensure_object(node)
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        ensure_object(node).insert(last.clone(), self.value.clone());
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

/// Find the theme file for a name or path.
pub fn locate_theme_file(name: &str, themes_dir: &Path) -> Option<PathBuf> {
    let literal = PathBuf::from(name);
    if literal.is_file() {
        return Some(literal);
    }
    let named = themes_dir.join(format!("{name}.json"));
    named.is_file().then_some(named)
}

/// Load a theme file layer. A theme that cannot be found yields `None`.
pub fn load_theme_layer(name: &str, themes_dir: &Path) -> Result<Option<Value>, ThemeError> {
    let Some(path) = locate_theme_file(name, themes_dir) else {
        tracing::debug!(theme = name, dir = %themes_dir.display(), "Theme file not found, keeping defaults");
        return Ok(None);
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ThemeError::Read {
        path: path.clone(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| ThemeError::Parse {
        path: path.clone(),
        source,
    })?;
    if !value.is_object() {
        return Err(ThemeError::NotAnObject { path });
    }

    tracing::debug!(path = %path.display(), "Loaded theme file");
    Ok(Some(value))
}

/// Errors that can occur while resolving a theme.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Failed to read theme {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in theme {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Theme {path} must contain a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("Unknown preset '{name}' (known: {known})")]
    UnknownPreset { name: String, known: String },

    #[error("Invalid override '{raw}': {reason}")]
    InvalidOverride { raw: String, reason: String },

    #[error("Resolved theme is invalid: {source}")]
    Invalid { source: serde_json::Error },
}
