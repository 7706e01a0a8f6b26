//! Thin wrappers around the system `git` executable.
//!
//! Every operation shells out to `git`, which automatically picks up SSH
//! keys, credential helpers and anything else configured in `~/.gitconfig`.
//! Terminal prompts are disabled so a repository that needs credentials
//! fails fast instead of blocking a worker thread.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Options that shape a `git clone` invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Clone with `--depth 1`.
    pub shallow: bool,
    /// Clone with `--recurse-submodules`.
    pub recurse_submodules: bool,
}

/// How `git switch` should treat its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchMode {
    /// Switch to an existing branch.
    Existing,
    /// Create the branch and switch to it (`--create`).
    Create,
    /// Detach HEAD at a commit or tag (`--detach`).
    Detach,
}

fn git_command(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    // Output is matched against English messages
    cmd.current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("LC_ALL", "C");
    cmd
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

fn execute(dir: &Path, args: &[&str], color: bool) -> Result<String> {
    let mut cmd = git_command(dir);
    if color {
        cmd.args(["-c", "color.ui=always"]);
    }
    let output = cmd.args(args).output().map_err(|e| Error::GitCommand {
        command: args.join(" "),
        path: dir.to_path_buf(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            path: dir.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(combined_output(&output))
}

/// Runs `git <args>` in `dir` and returns stdout followed by stderr.
pub fn run(dir: &Path, args: &[&str]) -> Result<String> {
    execute(dir, args, false)
}

/// Like [`run`], but asks git to colorize its output when `color` is set.
pub fn run_colored(dir: &Path, args: &[&str], color: bool) -> Result<String> {
    execute(dir, args, color)
}

/// Checks whether `dir` is the root of a git working tree.
pub fn is_git_repository(dir: &Path) -> bool {
    dir.is_dir() && dir.join(".git").exists()
}

/// Checks whether a version string looks like an abbreviated or full SHA-1.
pub fn is_valid_sha(version: &str) -> bool {
    (7..=40).contains(&version.len()) && version.chars().all(|c| c.is_ascii_hexdigit())
}

/// Builds the argument list for `git clone`.
///
/// Commit versions cannot be passed to `--branch`, so they are cloned at the
/// default branch and checked out afterwards.
pub fn clone_args(url: &str, version: &str, target: &Path, options: &CloneOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["clone".into()];
    if !version.is_empty() && !is_valid_sha(version) {
        args.push("--branch".into());
        args.push(version.into());
    }
    if options.shallow {
        args.push("--depth".into());
        args.push("1".into());
    }
    if options.recurse_submodules {
        args.push("--recurse-submodules".into());
    }
    args.push(url.into());
    args.push(target.as_os_str().to_owned());
    args
}

/// Clones `url` into `target`, checking out `version` when given.
///
/// The caller owns the destination policy: this function expects `target` not
/// to exist yet.
pub fn clone(url: &str, version: &str, target: &Path, options: &CloneOptions) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let clone_error = |message: String| Error::GitClone {
        url: url.to_string(),
        version: version.to_string(),
        message,
    };

    let output = git_command(Path::new("."))
        .args(clone_args(url, version, target, options))
        .output()
        .map_err(|e| clone_error(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("could not read Username")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository \
                 (SSH key loaded in ssh-agent, or a credential helper configured).\n\
                 Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };
        return Err(clone_error(message));
    }

    if is_valid_sha(version) {
        switch(target, version, SwitchMode::Detach).map_err(|e| clone_error(e.to_string()))?;
    }
    Ok(())
}

/// Runs `git status`, in short-branch form when `plain` is set.
pub fn status(path: &Path, plain: bool, color: bool) -> Result<String> {
    if plain {
        run_colored(path, &["status", "-sb"], color)
    } else {
        run_colored(path, &["status"], color)
    }
}

/// Returns the checked-out branch, or a tag pointing at HEAD when detached.
///
/// Returns an empty string when HEAD is detached on an untagged commit.
pub fn current_branch(path: &Path) -> Result<String> {
    let branch = run(path, &["branch", "--show-current"])?;
    let branch = branch.trim();
    if !branch.is_empty() {
        return Ok(branch.to_string());
    }

    let tags = run(path, &["tag", "--points-at", "HEAD"])?;
    Ok(tags.lines().next().unwrap_or_default().trim().to_string())
}

/// Returns the full SHA of HEAD.
pub fn commit_sha(path: &Path) -> Result<String> {
    Ok(run(path, &["rev-parse", "--verify", "HEAD"])?.trim().to_string())
}

/// Returns the URL of the `origin` remote.
pub fn remote_url(path: &Path) -> Result<String> {
    Ok(run(path, &["remote", "get-url", "origin"])?.trim().to_string())
}

/// Runs `git pull`.
pub fn pull(path: &Path) -> Result<String> {
    run(path, &["pull"])
}

/// Stashes local changes, pulls, then restores the stash this call created.
///
/// A stash that existed before the call is never popped.
pub fn sync(path: &Path) -> Result<String> {
    let stash_output = run(path, &["stash", "push"])?;
    let stashed = !stash_output.contains("No local changes to save");

    let mut output = stash_output;
    let pulled = pull(path);
    let popped = if stashed {
        run(path, &["stash", "pop"]).map(Some)
    } else {
        Ok(None)
    };
    output.push_str(&combine_sync(path, pulled, popped)?);
    Ok(output)
}

/// Folds the pull and stash-pop results of [`sync`].
///
/// A pull error stays the primary error. A failed pop is appended to it so
/// the user learns their changes are still stashed.
fn combine_sync(
    path: &Path,
    pulled: Result<String>,
    popped: Result<Option<String>>,
) -> Result<String> {
    match (pulled, popped) {
        (Ok(pull_output), Ok(pop_output)) => {
            Ok(pull_output + pop_output.as_deref().unwrap_or_default())
        }
        (Err(pull_error), Ok(_)) => Err(pull_error),
        (Ok(_), Err(pop_error)) => Err(pop_error),
        (Err(pull_error), Err(pop_error)) => {
            let note = format!(
                "restoring the stash also failed, changes remain in `git stash list`: {}",
                pop_error
            );
            Err(match pull_error {
                Error::GitCommand {
                    command,
                    path,
                    stderr,
                } => Error::GitCommand {
                    command,
                    path,
                    stderr: format!("{}\n{}", stderr, note),
                },
                other => Error::GitCommand {
                    command: "pull".to_string(),
                    path: path.to_path_buf(),
                    stderr: format!("{}\n{}", other, note),
                },
            })
        }
    }
}

/// Runs `git log -n <count>`, one line per commit when `oneline` is set.
pub fn log(path: &Path, count: usize, oneline: bool, color: bool) -> Result<String> {
    let count = count.to_string();
    let mut args = vec!["log", "-n", count.as_str()];
    if oneline {
        args.push("--oneline");
    }
    run_colored(path, &args, color)
}

/// Runs `git switch` towards `target`.
pub fn switch(path: &Path, target: &str, mode: SwitchMode) -> Result<String> {
    let mut args = vec!["switch"];
    match mode {
        SwitchMode::Existing => {}
        SwitchMode::Create => args.push("--create"),
        SwitchMode::Detach => args.push("--detach"),
    }
    args.push(target);
    run(path, &args)
}

/// Checks that `url` is reachable and, when given, advertises `version`.
///
/// Commit SHAs are not advertised by `ls-remote`, so for them only the URL is
/// checked.
pub fn check_remote(url: &str, version: &str) -> Result<()> {
    let mut args = vec!["ls-remote", url];
    if !version.is_empty() && !is_valid_sha(version) {
        args.push(version);
    }
    let output = run(Path::new("."), &args)?;
    if output.trim().is_empty() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            path: Path::new(".").to_path_buf(),
            stderr: format!("version '{}' not found on remote", version),
        });
    }
    Ok(())
}
