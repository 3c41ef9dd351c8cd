//! # Run outcome vocabulary.
//!
//! [`RunState`] is shared between the host and observers as a comparable,
//! serializable tag. The numeric codes are part of the storage/wire contract:
//!
//! | state         | code |
//! |---------------|------|
//! | `NOT_STARTED` | -2   |
//! | `CRASHED`     | -1   |
//! | `RUNNING`     | 0    |
//! | `SUCCESS`     | 1    |
//!
//! No transition table is enforced. The usual lifecycle is
//! `NOT_STARTED → RUNNING → {SUCCESS, CRASHED}`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of an instrumented run.
///
/// Serializes as its integer code.
///
/// # Example
/// ```
/// use labvisor::RunState;
///
/// assert_eq!(RunState::Crashed.code(), -1);
/// assert_eq!(RunState::try_from(1_i8), Ok(RunState::Success));
/// assert_eq!(serde_json::to_string(&RunState::NotStarted).unwrap(), "-2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
#[repr(i8)]
pub enum RunState {
    NotStarted = -2,
    Crashed = -1,
    Running = 0,
    Success = 1,
}

impl RunState {
    /// Numeric code of the state.
    #[inline]
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Upper-case name, as shown to users.
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::NotStarted => "NOT_STARTED",
            RunState::Crashed => "CRASHED",
            RunState::Running => "RUNNING",
            RunState::Success => "SUCCESS",
        }
    }

    /// True for `SUCCESS` and `CRASHED`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Success | RunState::Crashed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RunState> for i8 {
    fn from(state: RunState) -> Self {
        state.code()
    }
}

/// Returned when an integer does not name a [`RunState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown run state code {0}")]
pub struct UnknownRunState(pub i8);

impl TryFrom<i8> for RunState {
    type Error = UnknownRunState;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            -2 => Ok(RunState::NotStarted),
            -1 => Ok(RunState::Crashed),
            0 => Ok(RunState::Running),
            1 => Ok(RunState::Success),
            other => Err(UnknownRunState(other)),
        }
    }
}
