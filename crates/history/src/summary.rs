//! Pure aggregation of `git log` / `git diff` output.

use cinema_model::analysis::{
    CommitRange, CommitSummary, Contributor, DirectoryChange, RangeStats, ReleaseAnalysis,
};

/// Separates the fields of one log line. Subjects may contain `|`, never
/// an ASCII unit separator.
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// Commits kept in `top_commits`.
pub const TOP_COMMITS: usize = 5;
/// Directories kept in `top_dirs`.
pub const TOP_DIRS: usize = 5;

/// Parse `sha<US>author<US>date<US>subject` lines. Blank lines are skipped;
/// missing trailing fields become empty strings.
pub fn parse_log(output: &str) -> Vec<CommitSummary> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(4, FIELD_SEPARATOR);
            let mut next = || fields.next().unwrap_or_default().to_string();
            CommitSummary {
                sha: next(),
                author: next(),
                date: next(),
                subject: next(),
            }
        })
        .collect()
}

/// First path segment, or the whole path when it has none.
pub fn top_level_dir(path: &str) -> &str {
    match path.split('/').next() {
        Some(first) if !first.is_empty() => first,
        _ => path,
    }
}

/// Count occurrences and order by count descending. Equal counts keep the
/// order in which keys were first seen.
fn ranked<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Build the release report for `range`.
pub fn summarize(
    range: CommitRange,
    commits: Vec<CommitSummary>,
    files: Vec<String>,
) -> ReleaseAnalysis {
    let contributors = ranked(commits.iter().map(|c| c.author.as_str()))
        .into_iter()
        .map(|(author, count)| Contributor { author, count })
        .collect();

    let top_dirs: Vec<DirectoryChange> = ranked(files.iter().map(|f| top_level_dir(f)))
        .into_iter()
        .take(TOP_DIRS)
        .map(|(name, count)| DirectoryChange { name, count })
        .collect();

    let stats = RangeStats {
        commits: commits.len(),
        files: files.len(),
        dirs: top_dirs.len(),
    };

    ReleaseAnalysis {
        range,
        stats,
        top_commits: commits.into_iter().take(TOP_COMMITS).collect(),
        contributors,
        top_dirs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(sha: &str, author: &str, subject: &str) -> String {
        [sha, author, "2024-05-01", subject].join("\u{1f}")
    }

    #[test]
    fn test_parse_log_keeps_pipes_in_subject() {
        let out = format!("{}\n\n{}", line("a1", "alice", "feat: a | b"), line("b2", "bob", "fix"));
        let commits = parse_log(&out);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "feat: a | b");
        assert_eq!(commits[1].author, "bob");
        assert_eq!(commits[1].date, "2024-05-01");
    }

    #[test]
    fn test_parse_log_empty_output() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\n  \n").is_empty());
    }

    #[test]
    fn test_parse_log_short_line() {
        let commits = parse_log("abc1234");
        assert_eq!(commits[0].sha, "abc1234");
        assert_eq!(commits[0].subject, "");
    }

    #[test]
    fn test_top_level_dir() {
        assert_eq!(top_level_dir("src/main.rs"), "src");
        assert_eq!(top_level_dir("README.md"), "README.md");
        assert_eq!(top_level_dir("/etc/hosts"), "/etc/hosts");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let files = ["b/1", "a/1", "c/1", "a/2", "b/2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = summarize(CommitRange::new("x", "y"), vec![], files);
        let names: Vec<_> = report.top_dirs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_top_dirs_capped_and_counted() {
        let files = (0..8).map(|i| format!("dir{i}/file")).collect();
        let report = summarize(CommitRange::new("x", "y"), vec![], files);
        assert_eq!(report.top_dirs.len(), TOP_DIRS);
        assert_eq!(report.stats.dirs, TOP_DIRS);
        assert_eq!(report.stats.files, 8);
    }

    #[test]
    fn test_empty_range() {
        let report = summarize(CommitRange::new("v1", "HEAD"), vec![], vec![]);
        assert_eq!(report.stats, RangeStats { commits: 0, files: 0, dirs: 0 });
        assert!(report.contributors.is_empty());
        assert!(report.top_commits.is_empty());
    }
}
