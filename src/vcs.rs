//! Git command runner
//!
//! Thin wrapper over the `git` executable. Every call blocks, so callers run
//! these on a background thread and send the result back as a message.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("git {command} failed: {output}")]
    Failed { command: String, output: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Untracked,
    Unmodified,
}

impl FileStatus {
    /// One-letter marker for the panel
    pub fn marker(self) -> char {
        match self {
            FileStatus::Modified => 'M',
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Untracked => '?',
            FileStatus::Unmodified => ' ',
        }
    }
}

/// One line of `git status --porcelain`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Path relative to the repository root
    pub path: String,
    pub status: FileStatus,
    /// Index column holds a change
    pub staged: bool,
}

/// Everything the panel shows about a repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcsSnapshot {
    pub is_repo: bool,
    pub branch: String,
    pub ahead: u32,
    pub behind: u32,
    pub entries: Vec<StatusEntry>,
}

/// Incremental output of a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    Line(String),
    Finished(Result<(), String>),
}

/// Parse porcelain v1 output
pub fn parse_porcelain(output: &str) -> Vec<StatusEntry> {
    output
        .lines()
        .filter(|line| line.len() >= 4)
        .filter_map(|line| {
            let mut codes = line.chars();
            let x = codes.next()?;
            let y = codes.next()?;
            // renames and copies read `old -> new`; the entry is the new path
            let field = line.get(3..)?.trim();
            let field = field.rsplit_once(" -> ").map_or(field, |(_, new)| new);
            let path = field.trim_matches('"').to_string();

            let status = if x == '?' && y == '?' {
                FileStatus::Untracked
            } else if x == 'R' || y == 'R' {
                FileStatus::Renamed
            } else if x == 'A' || y == 'A' {
                FileStatus::Added
            } else if x == 'D' || y == 'D' {
                FileStatus::Deleted
            } else if x == 'M' || y == 'M' {
                FileStatus::Modified
            } else {
                FileStatus::Unmodified
            };

            Some(StatusEntry {
                path,
                status,
                staged: x != ' ' && x != '?',
            })
        })
        .collect()
}

/// Parse `git rev-list --left-right --count` output into (ahead, behind)
pub fn parse_ahead_behind(output: &str) -> Option<(u32, u32)> {
    let mut fields = output.split_whitespace();
    let ahead = fields.next()?.parse().ok()?;
    let behind = fields.next()?.parse().ok()?;
    Some((ahead, behind))
}

/// True when a push failure came from missing credentials
pub fn is_auth_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("terminal prompts disabled")
        || lower.contains("authentication failed")
        || lower.contains("could not read username")
}

/// Runs git inside one working directory
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        cmd
    }

    /// Run and return stdout, or the trimmed combined output as an error
    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = self.command(args).output()?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let mut text = String::from_utf8_lossy(&output.stderr).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stdout));
        Err(VcsError::Failed {
            command: args.first().copied().unwrap_or_default().to_string(),
            output: text.trim().to_string(),
        })
    }

    pub fn is_repo(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"]).is_ok()
    }

    /// Status, branch and upstream distance in one go
    pub fn snapshot(&self) -> Result<VcsSnapshot, VcsError> {
        if !self.is_repo() {
            return Ok(VcsSnapshot::default());
        }
        let entries = parse_porcelain(&self.run(&["status", "--porcelain"])?);
        let branch = self
            .run(&["symbolic-ref", "--short", "HEAD"])
            .map(|b| b.trim().to_string())
            .unwrap_or_else(|_| "HEAD".to_string());
        let (ahead, behind) = self
            .run(&["rev-list", "--left-right", "--count", "HEAD...@{u}"])
            .ok()
            .and_then(|out| parse_ahead_behind(&out))
            .unwrap_or((0, 0));

        Ok(VcsSnapshot {
            is_repo: true,
            branch,
            ahead,
            behind,
            entries,
        })
    }

    pub fn stage(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["add", "--", path]).map(drop)
    }

    pub fn unstage(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["reset", "-q", "--", path]).map(drop)
    }

    pub fn stage_all(&self) -> Result<(), VcsError> {
        self.run(&["add", "-A"]).map(drop)
    }

    /// Commit staged changes, returning git's summary line
    pub fn commit(&self, message: &str) -> Result<String, VcsError> {
        let out = self.run(&["commit", "-m", message])?;
        Ok(out.lines().next().unwrap_or_default().trim().to_string())
    }

    pub fn init(&self) -> Result<(), VcsError> {
        self.run(&["init"]).map(drop)
    }

    /// Unified diff of one entry; untracked files yield their content
    pub fn diff(&self, entry: &StatusEntry) -> Result<String, VcsError> {
        if entry.status == FileStatus::Untracked {
            return Ok(std::fs::read_to_string(self.root.join(&entry.path))?);
        }
        let mut args = vec!["diff", "--no-color"];
        if entry.staged {
            args.push("--cached");
        }
        args.extend(["--", entry.path.as_str()]);
        self.run(&args)
    }

    /// Push the current branch, forwarding output lines as they arrive.
    /// Always finishes with a `PushEvent::Finished`.
    pub fn push_streaming(&self, events: &Sender<PushEvent>) {
        let result = self.push_inner(events);
        let _ = events.send(PushEvent::Finished(result));
    }

    fn push_inner(&self, events: &Sender<PushEvent>) -> Result<(), String> {
        let mut child = self
            .command(&["push", "-u", "origin", "HEAD"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| e.to_string())?;

        // git writes progress to stderr; stdout is drained on its own thread
        let stdout = child.stdout.take();
        let stdout_events = events.clone();
        let stdout_thread = std::thread::spawn(move || {
            if let Some(stdout) = stdout {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    let _ = stdout_events.send(PushEvent::Line(line));
                }
            }
        });

        let mut last_line = String::new();
        if let Some(stderr) = child.stderr.take() {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                if !line.trim().is_empty() {
                    last_line = line.trim().to_string();
                }
                let _ = events.send(PushEvent::Line(line));
            }
        }
        let _ = stdout_thread.join();

        let status = child.wait().map_err(|e| e.to_string())?;
        if status.success() {
            Ok(())
        } else if last_line.is_empty() {
            Err(format!("git push exited with {status}"))
        } else {
            Err(last_line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_porcelain_codes() {
        let out = " M src/main.rs\nM  staged.rs\n?? new file.txt\nA  added.rs\n D gone.rs\nMM both.rs\n";
        let entries = parse_porcelain(out);
        assert_eq!(entries.len(), 6);

        assert_eq!(entries[0].status, FileStatus::Modified);
        assert!(!entries[0].staged);
        assert_eq!(entries[1].path, "staged.rs");
        assert!(entries[1].staged);
        assert_eq!(entries[2].status, FileStatus::Untracked);
        assert!(!entries[2].staged);
        assert_eq!(entries[2].path, "new file.txt");
        assert_eq!(entries[3].status, FileStatus::Added);
        assert!(entries[3].staged);
        assert_eq!(entries[4].status, FileStatus::Deleted);
        assert!(!entries[4].staged);
        assert!(entries[5].staged);
    }

    #[test]
    fn test_parse_porcelain_rename_keeps_new_path() {
        let entries = parse_porcelain("R  old.rs -> src/new.rs\nRM \"a b.rs\" -> \"c d.rs\"\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "src/new.rs");
        assert_eq!(entries[0].status, FileStatus::Renamed);
        assert_eq!(entries[0].status.marker(), 'R');
        assert!(entries[0].staged);
        assert_eq!(entries[1].path, "c d.rs");
    }

    #[test]
    fn test_parse_porcelain_skips_short_lines() {
        assert!(parse_porcelain("\nM\n").is_empty());
    }

    #[test]
    fn test_parse_porcelain_strips_quotes() {
        let entries = parse_porcelain("?? \"with space.txt\"\n");
        assert_eq!(entries[0].path, "with space.txt");
    }

    #[test]
    fn test_parse_ahead_behind() {
        assert_eq!(parse_ahead_behind("3\t1\n"), Some((3, 1)));
        assert_eq!(parse_ahead_behind(""), None);
    }

    #[test]
    fn test_auth_failure_detection() {
        assert!(is_auth_failure(
            "fatal: could not read Username for 'https://github.com': terminal prompts disabled"
        ));
        assert!(!is_auth_failure("rejected: non-fast-forward"));
    }

    #[test]
    fn test_snapshot_outside_repo_is_not_repo() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::new(dir.path());
        if let Ok(snapshot) = git.snapshot() {
            assert!(!snapshot.is_repo);
        }
    }
}
