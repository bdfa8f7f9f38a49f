//! Thin wrapper over the `git` command line.

use std::path::PathBuf;

use cinema_common::error::{CinemaError, CinemaResult};
use cinema_common::process::Invocation;
use cinema_model::analysis::{CommitRange, CommitSummary};

use crate::summary::parse_log;

/// How the caller wants the commit range chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeRequest {
    /// Latest tag (or the root commit) up to `HEAD`.
    Auto,
    /// Explicit endpoints. Both must be present.
    Explicit {
        from: Option<String>,
        to: Option<String>,
    },
}

impl RangeRequest {
    /// Build from the CLI flags. `--auto` wins over `--from/--to`.
    pub fn from_flags(auto: bool, from: Option<String>, to: Option<String>) -> Self {
        if auto {
            RangeRequest::Auto
        } else {
            RangeRequest::Explicit { from, to }
        }
    }
}

/// A `git` binary bound to a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    binary: String,
    repo_dir: PathBuf,
}

impl Git {
    pub fn new(binary: impl Into<String>, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            repo_dir: repo_dir.into(),
        }
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(&self.binary).current_dir(&self.repo_dir)
    }

    pub fn is_inside_work_tree(&self) -> bool {
        self.invocation()
            .args(["rev-parse", "--is-inside-work-tree"])
            .succeeds()
    }

    /// Fail with an environment error unless `repo_dir` is inside a work tree.
    pub fn ensure_repository(&self) -> CinemaResult<()> {
        if self.is_inside_work_tree() {
            Ok(())
        } else {
            Err(CinemaError::environment("Not a git repository."))
        }
    }

    pub fn resolve_range(&self, request: &RangeRequest) -> CinemaResult<CommitRange> {
        match request {
            RangeRequest::Auto => {
                let from = match self.latest_tag() {
                    Ok(tag) if !tag.is_empty() => tag,
                    _ => {
                        tracing::debug!("No tags found; starting from the root commit");
                        self.root_commit()?
                    }
                };
                Ok(CommitRange::new(from, "HEAD"))
            }
            RangeRequest::Explicit {
                from: Some(from),
                to: Some(to),
            } => {
                validate_ref("--from", from)?;
                validate_ref("--to", to)?;
                Ok(CommitRange::new(from.clone(), to.clone()))
            }
            RangeRequest::Explicit { .. } => Err(CinemaError::input(
                "Provide --auto or both --from and --to.",
            )),
        }
    }

    pub fn latest_tag(&self) -> CinemaResult<String> {
        self.invocation()
            .args(["describe", "--tags", "--abbrev=0"])
            .run()
    }

    /// First parentless commit reachable from `HEAD`.
    pub fn root_commit(&self) -> CinemaResult<String> {
        let out = self
            .invocation()
            .args(["rev-list", "--max-parents=0", "HEAD"])
            .run()?;
        out.lines()
            .next()
            .map(str::to_string)
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| CinemaError::environment("Repository has no commits."))
    }

    /// Commits in `range`, newest first.
    pub fn log(&self, range: &CommitRange) -> CinemaResult<Vec<CommitSummary>> {
        let format = format!(
            "--pretty=format:%h{sep}%an{sep}%ad{sep}%s",
            sep = FIELD_SEPARATOR_FORMAT
        );
        let out = self
            .invocation()
            .args(["log", "--date=short", format.as_str(), "--end-of-options"])
            .arg(range.spec())
            .run()?;
        Ok(parse_log(&out))
    }

    /// Paths changed between the range endpoints.
    pub fn changed_files(&self, range: &CommitRange) -> CinemaResult<Vec<String>> {
        let out = self
            .invocation()
            .args(["diff", "--name-only", "--end-of-options"])
            .arg(range.spec())
            .run()?;
        Ok(out
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Refs are user text; one that starts with `-` would be read as an option.
fn validate_ref(flag: &str, value: &str) -> CinemaResult<()> {
    if value.is_empty() || value.starts_with('-') {
        return Err(CinemaError::input(format!(
            "Invalid {flag} value '{value}': expected a commit, tag or branch"
        )));
    }
    Ok(())
}

/// `git log` placeholder for the unit separator in [`crate::summary::FIELD_SEPARATOR`].
const FIELD_SEPARATOR_FORMAT: &str = "%x1f";
