//! # Host, process and git metadata.
//!
//! [`RuntimeInfo`] is the payload of `on_runtime_info_update`. It is gathered once
//! per run by [`RuntimeInfo::collect`]; every field is best effort.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{git, os, uv};
use crate::core::Config;

/// Placeholder written over a masked secret.
pub const MASK: &str = "****";

/// Snapshot of the environment a run executes in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// `os-arch`, e.g. `linux-x86_64`.
    pub os: Option<String>,
    /// Distribution name from os-release, e.g. `Ubuntu 22.04.4 LTS`.
    pub os_pretty_name: Option<String>,
    pub hostname: Option<String>,
    pub pid: Option<u32>,
    pub cwd: Option<PathBuf>,
    /// Command line of the host process, secrets masked.
    pub command: Option<String>,
    pub git_remote: Option<String>,
    pub git_branch: Option<String>,
    pub git_commit: Option<String>,
    /// `uv pip list --format=freeze` output, when uv is available.
    pub uv: Option<String>,
}

impl RuntimeInfo {
    /// Gathers metadata for the current process.
    ///
    /// Returns an empty snapshot when `config.collect_runtime` is false.
    pub fn collect(config: &Config) -> Self {
        if !config.collect_runtime {
            return Self::default();
        }
        let (git_branch, git_commit) = git::branch_and_commit();
        let args: Vec<String> = std::env::args().collect();

        Self {
            os: Some(format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)),
            os_pretty_name: os::pretty_name(),
            hostname: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok()),
            pid: Some(std::process::id()),
            cwd: std::env::current_dir().ok(),
            command: Some(command_line(&args, config.mask_secret.as_deref())),
            git_remote: git::remote_url(),
            git_branch,
            git_commit,
            uv: uv::packages(),
        }
    }

    /// True when nothing was collected.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Joins process arguments, replacing any argument equal to `secret` with [`MASK`].
pub(crate) fn command_line(args: &[String], secret: Option<&str>) -> String {
    args.iter()
        .map(|arg| match secret {
            Some(s) if !s.is_empty() && arg == s => MASK,
            _ => arg.as_str(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn secret_is_masked() {
        let line = command_line(&args(&["train", "--key", "sk-123", "--epochs", "3"]), Some("sk-123"));
        assert_eq!(line, "train --key **** --epochs 3");
    }

    #[test]
    fn no_secret_keeps_args() {
        let line = command_line(&args(&["train", "sk-123"]), None);
        assert_eq!(line, "train sk-123");
        let line = command_line(&args(&["train", ""]), Some(""));
        assert_eq!(line, "train ");
    }

    #[test]
    fn disabled_collection_is_empty() {
        let cfg = Config {
            collect_runtime: false,
            ..Config::default()
        };
        let info = RuntimeInfo::collect(&cfg);
        assert!(info.is_empty());
        assert_eq!(info.os_pretty_name, None);
        assert_eq!(info.uv, None);
    }

    #[test]
    fn enabled_collection_has_process_fields() {
        let info = RuntimeInfo::collect(&Config::default());
        assert_eq!(info.pid, Some(std::process::id()));
        assert!(info.os.is_some());
        assert!(info.command.is_some());
    }
}
