//! The release analysis report printed by `analyze` and fed to the trailer.

use serde::{Deserialize, Serialize};

/// Summary of a commit range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseAnalysis {
    pub range: CommitRange,
    pub stats: RangeStats,
    /// The first commits of the range in log order (newest first), at most 5.
    pub top_commits: Vec<CommitSummary>,
    /// Every author, most commits first.
    pub contributors: Vec<Contributor>,
    /// Top-level directories by changed file count, at most 5.
    pub top_dirs: Vec<DirectoryChange>,
}

/// A `from..to` revision range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStats {
    pub commits: usize,
    pub files: usize,
    /// Number of entries in `top_dirs`.
    pub dirs: usize,
}

/// One line of `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Abbreviated hash.
    pub sha: String,
    pub author: String,
    /// Short date (`YYYY-MM-DD`).
    pub date: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryChange {
    pub name: String,
    pub count: usize,
}

impl CommitRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Revision spec understood by `git log` and `git diff`.
    pub fn spec(&self) -> String {
        format!("{}..{}", self.from, self.to)
    }
}
