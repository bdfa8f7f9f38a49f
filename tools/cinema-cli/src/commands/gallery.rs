//! Maintain the gallery block in the README.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;

use cinema_common::config::AppConfig;
use cinema_history::RangeRequest;
use cinema_model::analysis::CommitRange;

pub const GALLERY_START: &str = "<!-- GALLERY:START -->";
pub const GALLERY_END: &str = "<!-- GALLERY:END -->";

/// Which artifacts exist, and the links used for them.
#[derive(Debug, Clone)]
pub struct GalleryAssets {
    pub trailer_gif: Option<String>,
    pub trailer_mp4: Option<String>,
    pub cli_gif: Option<String>,
}

impl GalleryAssets {
    /// Probe `<root>/<assets_dir>` for the rendered artifacts.
    pub fn discover(root: &Path, assets_dir: &str) -> Self {
        let link = |name: &str| {
            let rel = format!("{}/{name}", assets_dir.trim_end_matches('/'));
            root.join(&rel).is_file().then_some(rel)
        };
        Self {
            trailer_gif: link("trailer.gif"),
            trailer_mp4: link("trailer.mp4"),
            cli_gif: link("cli_sim.gif"),
        }
    }
}

pub fn run(readme: PathBuf, assets_dir: String, config: &AppConfig) -> anyhow::Result<()> {
    if !readme.is_file() {
        anyhow::bail!("{} not found", readme.display());
    }
    let root = readme
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let git = super::repository(config);
    let range = git.resolve_range(&RangeRequest::Auto).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Range detection failed; using HEAD~..HEAD");
        CommitRange::new("HEAD~", "HEAD")
    });

    let assets = GalleryAssets::discover(root, &assets_dir);
    let updated = Utc::now().format("%Y-%m-%d").to_string();
    let block = gallery_block(&assets, &range, &updated);

    let old = std::fs::read_to_string(&readme)
        .with_context(|| format!("Failed to read {}", readme.display()))?;
    let next = upsert_section(&old, &block);
    if next != old {
        std::fs::write(&readme, &next)
            .with_context(|| format!("Failed to write {}", readme.display()))?;
        println!("README gallery updated.");
    } else {
        println!("No README changes (gallery up-to-date).");
    }
    Ok(())
}

/// The marked gallery section, markers included.
pub fn gallery_block(assets: &GalleryAssets, range: &CommitRange, updated: &str) -> String {
    let trailer_tile = match (&assets.trailer_gif, &assets.trailer_mp4) {
        (Some(gif), Some(mp4)) => format!("[![Trailer]({gif})]({mp4})"),
        (Some(gif), None) => format!("![Trailer]({gif})"),
        (None, _) => "_(no trailer yet)_".to_string(),
    };
    let cli_tile = match &assets.cli_gif {
        Some(gif) => format!("![CLI Simulation]({gif})"),
        None => "_(no CLI simulation yet)_".to_string(),
    };

    let body = if assets.trailer_gif.is_some() || assets.cli_gif.is_some() {
        format!("| Latest Trailer | CLI Simulation |\n| --- | --- |\n| {trailer_tile} | {cli_tile} |")
    } else {
        "_(no gallery assets yet)_".to_string()
    };

    format!(
        "{GALLERY_START}\n## Gallery\n\n{body}\n\n_Last updated: {updated} • Range: `{}` → `{}`_\n{GALLERY_END}",
        range.from, range.to
    )
}

/// Replace the marked section in place, or append it after a blank line.
pub fn upsert_section(readme: &str, block: &str) -> String {
    if let Some(start) = readme.find(GALLERY_START) {
        if let Some(end) = readme[start..].find(GALLERY_END) {
            let end = start + end + GALLERY_END.len();
            return format!("{}{block}{}", &readme[..start], &readme[end..]);
        }
    }
    let sep = if readme.ends_with('\n') { "" } else { "\n" };
    format!("{readme}{sep}\n\n{block}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_assets() -> GalleryAssets {
        GalleryAssets {
            trailer_gif: None,
            trailer_mp4: None,
            cli_gif: None,
        }
    }

    #[test]
    fn test_block_without_assets() {
        let block = gallery_block(&no_assets(), &CommitRange::new("HEAD~", "HEAD"), "2024-05-01");
        assert!(block.starts_with(GALLERY_START));
        assert!(block.ends_with(GALLERY_END));
        assert!(block.contains("_(no gallery assets yet)_"));
        assert!(block.contains("_Last updated: 2024-05-01 • Range: `HEAD~` → `HEAD`_"));
    }

    #[test]
    fn test_trailer_links_to_mp4() {
        let assets = GalleryAssets {
            trailer_gif: Some("assets/trailer.gif".into()),
            trailer_mp4: Some("assets/trailer.mp4".into()),
            cli_gif: None,
        };
        let block = gallery_block(&assets, &CommitRange::new("v1", "HEAD"), "2024-05-01");
        assert!(block.contains(
            "| [![Trailer](assets/trailer.gif)](assets/trailer.mp4) | _(no CLI simulation yet)_ |"
        ));
    }

    #[test]
    fn test_upsert_replaces_existing_block() {
        let readme = format!("# App\n\n{GALLERY_START}\nold\n{GALLERY_END}\n\nMore text\n");
        let next = upsert_section(&readme, "NEW");
        assert_eq!(next, "# App\n\nNEW\n\nMore text\n");
    }

    #[test]
    fn test_upsert_appends_when_missing() {
        assert_eq!(upsert_section("# App\n", "B"), "# App\n\n\nB\n");
        assert_eq!(upsert_section("# App", "B"), "# App\n\n\nB\n");
    }

    #[test]
    fn test_upsert_is_idempotent_for_same_block() {
        let block = gallery_block(&no_assets(), &CommitRange::new("a", "b"), "2024-05-01");
        let once = upsert_section("# App\n", &block);
        assert_eq!(upsert_section(&once, &block), once);
    }

    #[test]
    fn test_discover_finds_existing_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/cli_sim.gif"), b"GIF").unwrap();

        let assets = GalleryAssets::discover(dir.path(), "assets/");
        assert_eq!(assets.cli_gif.as_deref(), Some("assets/cli_sim.gif"));
        assert!(assets.trailer_gif.is_none());
    }
}
