//! Operating system release name.

use std::fs;
use std::path::Path;

const OS_RELEASE: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// `PRETTY_NAME` from the freedesktop os-release file, e.g. `Ubuntu 22.04.4 LTS`.
///
/// `None` off Linux, when no os-release file is readable, or when the key is absent.
pub fn pretty_name() -> Option<String> {
    pretty_name_from(&OS_RELEASE.map(Path::new))
}

fn pretty_name_from(paths: &[&Path]) -> Option<String> {
    let text = paths.iter().find_map(|p| fs::read_to_string(p).ok())?;
    parse_pretty_name(&text)
}

fn parse_pretty_name(text: &str) -> Option<String> {
    let value = text
        .lines()
        .filter_map(|line| line.trim().split_once('='))
        .find(|(key, _)| *key == "PRETTY_NAME")
        .map(|(_, value)| value.trim())?;
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
