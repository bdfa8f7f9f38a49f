//! End-to-end summaries: the pure aggregation over a fixed history and,
//! when `git` is installed, a scratch repository.

use std::path::Path;

use cinema_common::process::{find_tool, Invocation};
use cinema_history::{analyze, summarize, Git, RangeRequest};
use cinema_model::analysis::{CommitRange, CommitSummary};

fn commit(sha: &str, author: &str) -> CommitSummary {
    CommitSummary {
        sha: sha.to_string(),
        author: author.to_string(),
        date: "2024-05-01".to_string(),
        subject: format!("change {sha}"),
    }
}

#[test]
fn seven_commits_two_authors_two_dirs() {
    let authors = ["alice", "bob", "alice", "bob", "alice", "bob", "alice"];
    let commits = authors
        .iter()
        .enumerate()
        .map(|(i, a)| commit(&format!("c{i}"), a))
        .collect();
    let files = [
        "src/a.rs", "docs/x.md", "src/b.rs", "src/c.rs", "docs/y.md", "src/d.rs", "src/e.rs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let report = summarize(CommitRange::new("v1.0.0", "HEAD"), commits, files);

    assert_eq!(report.stats.commits, 7);
    assert_eq!(report.stats.files, 7);
    assert_eq!(report.stats.dirs, 2);
    let contributors: Vec<_> = report
        .contributors
        .iter()
        .map(|c| (c.author.as_str(), c.count))
        .collect();
    assert_eq!(contributors, vec![("alice", 4), ("bob", 3)]);
    let dirs: Vec<_> = report
        .top_dirs
        .iter()
        .map(|d| (d.name.as_str(), d.count))
        .collect();
    assert_eq!(dirs, vec![("src", 5), ("docs", 2)]);
    assert_eq!(report.top_commits.len(), 5);
    assert_eq!(report.top_commits[0].sha, "c0");
}

fn git(dir: &Path, args: &[&str]) {
    Invocation::new("git")
        .current_dir(dir)
        .args(args)
        .run()
        .unwrap();
}

fn commit_file(dir: &Path, path: &str, author: &str, message: &str) {
    let full = dir.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(&full, message).unwrap();
    git(dir, &["add", path]);
    git(
        dir,
        &[
            "-c",
            &format!("user.name={author}"),
            "-c",
            &format!("user.email={author}@example.com"),
            "commit",
            "-q",
            "-m",
            message,
        ],
    );
}

#[test]
fn auto_range_starts_at_latest_tag() {
    if find_tool("git").is_none() {
        eprintln!("git not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    git(root, &["init", "-q"]);
    commit_file(root, "README.md", "alice", "initial");
    git(
        root,
        &[
            "-c",
            "user.name=alice",
            "-c",
            "user.email=alice@example.com",
            "tag",
            "-a",
            "v0.1.0",
            "-m",
            "release: v0.1.0",
        ],
    );
    commit_file(root, "src/lib.rs", "bob", "feat: add lib | with pipe");
    commit_file(root, "docs/guide.md", "alice", "docs: guide");

    let repo = Git::new("git", root);
    assert!(repo.is_inside_work_tree());

    let report = analyze(&repo, &RangeRequest::Auto).unwrap();
    assert_eq!(report.range, CommitRange::new("v0.1.0", "HEAD"));
    assert_eq!(report.stats.commits, 2);
    assert_eq!(report.stats.files, 2);
    assert_eq!(report.top_commits[0].subject, "docs: guide");
    assert_eq!(report.top_commits[1].subject, "feat: add lib | with pipe");
    assert_eq!(report.contributors[0].author, "alice");
}

#[test]
fn option_like_refs_never_reach_git_as_options() {
    if find_tool("git").is_none() {
        eprintln!("git not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    git(root, &["init", "-q"]);
    commit_file(root, "README.md", "alice", "initial");
    let repo = Git::new("git", root);
    let target = root.join("pwned");
    let injected = format!("--output={}", target.display());

    let request = RangeRequest::from_flags(false, Some(injected.clone()), Some("HEAD".into()));
    assert!(analyze(&repo, &request).is_err());

    // Even a range built directly is passed after --end-of-options.
    let range = CommitRange::new(injected, "HEAD");
    assert!(repo.log(&range).is_err());
    assert!(repo.changed_files(&range).is_err());

    let leftovers: Vec<_> = std::fs::read_dir(root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("pwned"))
        .collect();
    assert!(leftovers.is_empty());
}
