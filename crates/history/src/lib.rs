//! # cinema-history
//!
//! Reads a repository's history through the `git` binary and condenses a
//! commit range into a [`ReleaseAnalysis`](cinema_model::ReleaseAnalysis).
//!
//! Parsing and aggregation are pure ([`summary`]); only [`git::Git`]
//! touches the process table.

pub mod git;
pub mod summary;

pub use git::{Git, RangeRequest};
pub use summary::{parse_log, summarize, top_level_dir};

use cinema_common::error::CinemaResult;
use cinema_model::analysis::ReleaseAnalysis;

/// Resolve the range, read it, and summarize it.
pub fn analyze(git: &Git, request: &RangeRequest) -> CinemaResult<ReleaseAnalysis> {
    let range = git.resolve_range(request)?;
    let commits = git.log(&range)?;
    let files = git.changed_files(&range)?;
    tracing::debug!(
        range = %range.spec(),
        commits = commits.len(),
        files = files.len(),
        "Read commit range"
    );
    Ok(summarize(range, commits, files))
}
