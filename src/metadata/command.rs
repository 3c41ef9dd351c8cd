//! Best-effort external command capture.

use std::process::Command;

/// Runs `program` with `args` and returns its trimmed stdout.
///
/// `None` when the program is missing, exits non-zero, prints non-UTF-8 or prints nothing.
pub(crate) fn capture(program: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(program).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
