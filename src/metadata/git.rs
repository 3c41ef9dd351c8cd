//! Git repository metadata.
//!
//! Everything here shells out to `git` in the current directory; any failure
//! (git missing, not a repository, detached head) yields `None`.

use super::command::capture;

/// Remote URL of `origin`, normalized with [`parse_git_url`].
pub fn remote_url() -> Option<String> {
    git(&["config", "--get", "remote.origin.url"]).map(|url| parse_git_url(&url))
}

/// Current branch and the commit it points at.
///
/// The commit is `None` when the branch exists but cannot be resolved (e.g. no commits yet).
pub fn branch_and_commit() -> (Option<String>, Option<String>) {
    let Some(branch) = git(&["branch", "--show-current"]) else {
        return (None, None);
    };
    let commit = git(&["rev-parse", &branch]);
    (Some(branch), commit)
}

/// Converts an ssh-style remote into a browsable https URL and strips `.git`.
///
/// ```rust
/// use labvisor::parse_git_url;
///
/// assert_eq!(parse_git_url("git@github.com:org/repo.git"), "https://github.com/org/repo");
/// assert_eq!(parse_git_url("https://github.com/org/repo.git"), "https://github.com/org/repo");
/// ```
pub fn parse_git_url(url: &str) -> String {
    let url = match url.strip_prefix("git@") {
        Some(rest) => {
            let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
            match host.rsplit_once(':') {
                Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
                    format!("https://{host}:{port}/{path}")
                }
                Some((host, segment)) => format!("https://{host}/{segment}/{path}"),
                None => format!("https://{host}/{path}"),
            }
        }
        None => url.to_string(),
    };
    match url.strip_suffix(".git") {
        Some(trimmed) => trimmed.to_string(),
        None => url,
    }
}

fn git(args: &[&str]) -> Option<String> {
    capture("git", args)
}
