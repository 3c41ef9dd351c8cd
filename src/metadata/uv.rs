//! Python environment snapshot taken through `uv`.

use super::command::capture;

/// Installed packages as reported by `uv pip list --format=freeze`.
///
/// `None` when uv is not installed, fails, or lists nothing.
pub fn packages() -> Option<String> {
    packages_with("uv")
}

fn packages_with(program: &str) -> Option<String> {
    capture(program, &["pip", "list", "--format=freeze"])
}
