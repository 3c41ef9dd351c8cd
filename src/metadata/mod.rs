//! Runtime metadata reported through `on_runtime_info_update`.

mod command;
mod git;
mod os;
mod runtime;
mod uv;

pub use git::parse_git_url;
pub use runtime::{MASK, RuntimeInfo};
