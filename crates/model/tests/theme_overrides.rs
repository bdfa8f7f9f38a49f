use cinema_model::theme::{Override, Theme};
use proptest::prelude::*;
use serde_json::Value;

/// Numeric leaves a theme file or `--set` can address.
const NUMERIC_LEAVES: [(&str, &str); 7] = [
    ("card", "radius"),
    ("spacing", "margin"),
    ("spacing", "padTop"),
    ("spacing", "gapTitleBody"),
    ("spacing", "padBottom"),
    ("typography", "titlePt"),
    ("typography", "bodyPt"),
];

fn leaves(theme: &Theme) -> Vec<(String, Value)> {
    let value = serde_json::to_value(theme).unwrap();
    let mut out = Vec::new();
    for (key, v) in value.as_object().unwrap() {
        match v {
            Value::Object(inner) => {
                for (leaf, leaf_value) in inner {
                    out.push((format!("{key}.{leaf}"), leaf_value.clone()));
                }
            }
            other => out.push((key.clone(), other.clone())),
        }
    }
    out
}

proptest! {
    #[test]
    fn override_touches_only_its_leaf(idx in 0usize..NUMERIC_LEAVES.len(), value in 1u32..4000) {
        let (section, leaf) = NUMERIC_LEAVES[idx];
        let target = format!("{section}.{leaf}");
        let raw = format!("{target}={value}");

        let theme = Theme::default().with_overrides(&[raw]).unwrap();

        for ((path, before), (_, after)) in leaves(&Theme::default()).into_iter().zip(leaves(&theme)) {
            if path == target {
                prop_assert_eq!(after, Value::from(value));
            } else {
                prop_assert_eq!(before, after, "sibling {} changed", path);
            }
        }
    }

    #[test]
    fn file_layer_preserves_unnamed_keys(
        idx in 0usize..NUMERIC_LEAVES.len(),
        value in 1u32..4000,
        accent in "#[0-9a-f]{6}",
    ) {
        let (section, leaf) = NUMERIC_LEAVES[idx];
        let mut inner = serde_json::Map::new();
        inner.insert(leaf.to_string(), Value::from(value));
        let mut layer = serde_json::json!({ "accent": accent.clone() });
        layer[section] = Value::Object(inner);

        let theme = Theme::default().merge_layer(&layer).unwrap();
        let target = format!("{section}.{leaf}");

        for ((path, before), (_, after)) in leaves(&Theme::default()).into_iter().zip(leaves(&theme)) {
            if path == target {
                prop_assert_eq!(after, Value::from(value));
            } else if path == "accent" {
                prop_assert_eq!(after, Value::from(accent.clone()));
            } else {
                prop_assert_eq!(before, after, "key {} changed", path);
            }
        }
    }

    #[test]
    fn string_values_survive_override_parsing(text in "F[a-z ]{0,20}") {
        let parsed: Override = format!("sans={text}").parse().unwrap();
        prop_assert_eq!(parsed.value, Value::String(text));
    }
}
