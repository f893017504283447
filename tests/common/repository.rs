//! Git repository management and setup utilities
//!
//! Every test repository comes with a bare `origin` remote living next to it in the
//! same temporary directory, so pushes and remote deletions stay on the local disk.

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Working repository plus its bare remote. The TempDir must be kept alive for the
/// duration of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub origin: PathBuf,
}

impl TestRepo {
    /// Get the working repository path as a reference
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory used as HOME/XDG config root so user settings never leak in
    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }
}

/// Runs git in `dir` and returns trimmed stdout, failing on a non-zero exit
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    git_with_env(dir, args, &[])
}

pub fn git_with_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .envs(env.iter().copied())
        .current_dir(dir)
        .output()?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up a working repository on `main` with one pushed commit
///
/// # Returns
///
/// A `TestRepo` whose `main` branch tracks `origin/main` and contains "initial.txt"
pub fn setup_repo_with_origin() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let origin = temp_dir.path().join("origin.git");
    let path = temp_dir.path().join("work");
    fs::create_dir_all(&path)?;
    fs::create_dir_all(temp_dir.path().join("home"))?;

    git(temp_dir.path(), &["init", "--bare", "origin.git"])?;
    git(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"])?;

    git(&path, &["init"])?;
    git(&path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    let origin_url = origin.to_string_lossy().to_string();
    git(&path, &["remote", "add", "origin", &origin_url])?;

    create_file(&path, "initial.txt", "initial content\n")?;
    commit_all(&path, "Initial commit")?;
    git(&path, &["push", "-q", "-u", "origin", "main"])?;

    Ok(TestRepo {
        temp_dir,
        path,
        origin,
    })
}

/// Creates a file with specified content, creating parent directories
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let target = repo_path.join(filename);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, content)?;
    Ok(())
}

pub fn read_file(repo_path: &Path, filename: &str) -> Result<String> {
    Ok(fs::read_to_string(repo_path.join(filename))?)
}

/// Stages everything and commits it
pub fn commit_all(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["add", "-A"])?;
    git(repo_path, &["commit", "-q", "-m", message])?;
    Ok(())
}

/// Publishes a stash-like branch holding `files`, committed `age_days` ago.
///
/// The branch is created from the current HEAD, pushed to origin and removed
/// locally, which matches what `8stash push` leaves behind.
pub fn push_stash_branch(
    repo: &TestRepo,
    name: &str,
    files: &[(&str, &str)],
    age_days: i64,
) -> Result<()> {
    let timestamp = chrono::Utc::now().timestamp() - age_days * SECONDS_PER_DAY;
    push_stash_branch_at(repo, name, files, timestamp)
}

pub fn push_stash_branch_at(
    repo: &TestRepo,
    name: &str,
    files: &[(&str, &str)],
    timestamp: i64,
) -> Result<()> {
    let path = repo.path();
    let current = git(path, &["branch", "--show-current"])?;
    let date = format!("{timestamp} +0000");
    let env = [
        ("GIT_AUTHOR_DATE", date.as_str()),
        ("GIT_COMMITTER_DATE", date.as_str()),
    ];

    git(path, &["checkout", "-q", "-b", name])?;
    for (file, content) in files {
        create_file(path, file, content)?;
    }
    git(path, &["add", "-A"])?;
    let message = format!("move local changes to branch {name}");
    git_with_env(path, &["commit", "-q", "-m", &message], &env)?;
    git(path, &["push", "-q", "origin", name])?;
    git(path, &["checkout", "-q", &current])?;
    git(path, &["branch", "-q", "-D", name])?;
    Ok(())
}

/// Branch names currently on the bare origin
pub fn remote_branches(repo: &TestRepo) -> Result<Vec<String>> {
    let listing = git(&repo.origin, &["for-each-ref", "--format=%(refname:short)", "refs/heads"])?;
    Ok(listing.lines().map(str::to_string).collect())
}

/// Branch names on origin under the default stash prefix
pub fn remote_stash_branches(repo: &TestRepo) -> Result<Vec<String>> {
    Ok(remote_branches(repo)?
        .into_iter()
        .filter(|name| name.starts_with("8stash/"))
        .collect())
}

/// Subject line of the tip commit of `branch` on origin
pub fn remote_commit_subject(repo: &TestRepo, branch: &str) -> Result<String> {
    git(&repo.origin, &["log", "-1", "--format=%s", branch])
}

/// Porcelain status of the working repository
pub fn status_porcelain(repo: &TestRepo) -> Result<String> {
    git(repo.path(), &["status", "--porcelain"])
}
