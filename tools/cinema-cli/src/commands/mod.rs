//! Subcommand implementations.

pub mod analyze;
pub mod check;
pub mod gallery;
pub mod render;
pub mod simulate;

use std::io::{IsTerminal, Write};

use anyhow::Context;
use chrono::{SecondsFormat, Utc};

use cinema_common::config::AppConfig;
use cinema_history::Git;
use cinema_model::branding::Branding;
use cinema_model::theme::{resolve_theme, Theme};
use cinema_render::{ExportProgress, ProgressCallback};

use crate::options::StyleArgs;

/// `git` bound to the current directory.
fn repository(config: &AppConfig) -> Git {
    Git::new(&config.tools.git, ".")
}

fn resolve_style(style: &StyleArgs, config: &AppConfig) -> anyhow::Result<(Theme, Branding)> {
    let theme = resolve_theme(&style.theme_source(), &config.themes_dir)
        .context("Failed to resolve theme")?;
    Ok((theme, style.branding()))
}

/// UTC timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
fn generated_at() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Progress line on stderr, only when stderr is a terminal.
fn progress_printer() -> Option<ProgressCallback> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    Some(Box::new(|p: ExportProgress| {
        let mut err = std::io::stderr();
        write!(
            err,
            "\r  Encoding: {:.1}% ({}/{} frames, ETA: {:.0}s)  ",
            p.progress * 100.0,
            p.frames_encoded,
            p.total_frames,
            p.eta_secs,
        )
        .ok();
        err.flush().ok();
    }))
}
