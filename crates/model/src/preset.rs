//! Output presets: named canvas sizes with a uniform scale factor.

use crate::theme::ThemeError;

/// A named output target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    /// Canvas size that replaces the theme's.
    pub width: u32,
    pub height: u32,
    /// Multiplier for spacing, typography, and card radius.
    pub scale: f64,
}

/// Every preset accepted by `--preset`.
pub const PRESETS: [Preset; 5] = [
    Preset {
        name: "hd",
        width: 1280,
        height: 720,
        scale: 1.0,
    },
    Preset {
        name: "youtube",
        width: 1920,
        height: 1080,
        scale: 1.5,
    },
    Preset {
        name: "instagram",
        width: 1080,
        height: 1080,
        scale: 0.90,
    },
    Preset {
        name: "story",
        width: 1080,
        height: 1920,
        scale: 1.0,
    },
    Preset {
        name: "twitter",
        width: 1200,
        height: 675,
        scale: 0.94,
    },
];

impl Preset {
    /// Look up a preset by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Preset, ThemeError> {
        let wanted = name.trim().to_ascii_lowercase();
        PRESETS
            .iter()
            .find(|p| p.name == wanted)
            .copied()
            .ok_or_else(|| ThemeError::UnknownPreset {
                name: name.to_string(),
                known: Self::names().join(", "),
            })
    }

    pub fn names() -> Vec<&'static str> {
        PRESETS.iter().map(|p| p.name).collect()
    }

    /// Scale a pixel or point value, rounding to nearest with a floor of 1.
    pub fn scale_value(&self, value: u32) -> u32 {
        ((value as f64 * self.scale).round() as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    #[test]
    fn test_instagram_preset_on_defaults() {
        let preset = Preset::from_name("instagram").unwrap();
        let theme = Theme::default().with_preset(&preset);

        assert_eq!(theme.width, 1080);
        assert_eq!(theme.height, 1080);
        assert_eq!(theme.spacing.margin, 58);
        assert_eq!(theme.spacing.pad_top, 38);
        assert_eq!(theme.spacing.gap_title_body, 36);
        assert_eq!(theme.spacing.pad_bottom, 43);
        assert_eq!(theme.typography.title_pt, 58);
        assert_eq!(theme.typography.body_pt, 31);
        assert_eq!(theme.card.radius, 32);
    }

    #[test]
    fn test_preset_leaves_colors_and_fonts() {
        let preset = Preset::from_name("youtube").unwrap();
        let theme = Theme::default().with_preset(&preset);
        let defaults = Theme::default();
        assert_eq!(theme.bg, defaults.bg);
        assert_eq!(theme.sans, defaults.sans);
        assert_eq!(theme.card.stroke, defaults.card.stroke);
        assert_eq!(theme.card.glass, defaults.card.glass);
        assert_eq!(theme.typography.title_pt, 96);
    }

    #[test]
    fn test_scale_value_has_floor_of_one() {
        let tiny = Preset {
            name: "tiny",
            width: 10,
            height: 10,
            scale: 0.01,
        };
        assert_eq!(tiny.scale_value(20), 1);
        assert_eq!(tiny.scale_value(0), 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Preset::from_name("Story").unwrap().height, 1920);
        assert!(Preset::from_name("cinema").is_err());
    }
}
