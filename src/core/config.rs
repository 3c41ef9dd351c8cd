//! # Tracking client configuration.
//!
//! Provides [`Config`] centralized settings for the dispatcher, the sampler and runtime metadata.
//!
//! Config is used in three places:
//! 1. **Dispatcher creation**: `Dispatcher::new(config)` / `Dispatcher::builder(config)`
//! 2. **Sampler creation**: `Sampler::spawn(probe, config.cadence())`
//! 3. **Runtime metadata**: `RuntimeInfo::collect(&config)`
//!
//! ## Sentinel values
//! - `sample_interval = 0s` → adaptive cadence (no fixed override)

use std::fmt;
use std::time::Duration;

use crate::policies::{Cadence, FailurePolicy};

/// Global configuration for a tracked run.
///
/// ## Field semantics
/// - `failure`: What a failing observer does to the rest of a fan-out
/// - `sample_interval`: Fixed sampling interval (`0s` = adaptive)
/// - `log_level`: Verbosity of the built-in console observer
/// - `collect_runtime`: Whether runtime metadata is gathered at all
/// - `mask_secret`: Secret replaced by `****` in the recorded command line
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over sentinel checks.
#[derive(Clone, Debug)]
pub struct Config {
    /// Observer failure handling for every dispatch.
    pub failure: FailurePolicy,

    /// Fixed interval between telemetry samples.
    ///
    /// - `Duration::ZERO` = adaptive cadence (10s / 30s / 60s)
    /// - `> 0` = this interval, always
    pub sample_interval: Duration,

    /// Console verbosity.
    pub log_level: LogLevel,

    /// Gather host, process and git metadata.
    pub collect_runtime: bool,

    /// Secret (e.g. an API key) to mask in the recorded command line.
    pub mask_secret: Option<String>,
}

impl Config {
    /// Returns the sampling cadence.
    ///
    /// - `Cadence::Adaptive` when `sample_interval` is zero
    /// - `Cadence::Fixed(sample_interval)` otherwise
    #[inline]
    pub fn cadence(&self) -> Cadence {
        if self.sample_interval == Duration::ZERO {
            Cadence::Adaptive
        } else {
            Cadence::Fixed(self.sample_interval)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `failure = FailurePolicy::Abort`
    /// - `sample_interval = 0s` (adaptive)
    /// - `log_level = LogLevel::Info`
    /// - `collect_runtime = true`
    /// - `mask_secret = None`
    fn default() -> Self {
        Self {
            failure: FailurePolicy::default(),
            sample_interval: Duration::ZERO,
            log_level: LogLevel::default(),
            collect_runtime: true,
            mask_secret: None,
        }
    }
}

/// Console log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Parses a user-supplied level.
    ///
    /// Accepts `debug`, `info`, `warning`, `error` and `critical` in any case.
    /// `None` yields `Info`; an unknown value logs a warning and also yields `Info`.
    ///
    /// # Example
    /// ```
    /// use labvisor::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse_or_default(Some("WARNING")), LogLevel::Warning);
    /// assert_eq!(LogLevel::parse_or_default(Some("verbose")), LogLevel::Info);
    /// assert_eq!(LogLevel::parse_or_default(None), LogLevel::Info);
    /// ```
    pub fn parse_or_default(level: Option<&str>) -> LogLevel {
        let Some(raw) = level else {
            return LogLevel::Info;
        };
        match raw.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            "critical" => LogLevel::Critical,
            _ => {
                tracing::warn!(level = raw, "invalid log level, falling back to info");
                LogLevel::Info
            }
        }
    }

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_means_adaptive() {
        let cfg = Config::default();
        assert_eq!(cfg.cadence(), Cadence::Adaptive);

        let cfg = Config {
            sample_interval: Duration::from_secs(3),
            ..Config::default()
        };
        assert_eq!(cfg.cadence(), Cadence::Fixed(Duration::from_secs(3)));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        assert_eq!(LogLevel::parse_or_default(Some("Debug")), LogLevel::Debug);
        assert_eq!(LogLevel::parse_or_default(Some("critical")), LogLevel::Critical);
        assert_eq!(LogLevel::parse_or_default(Some("")), LogLevel::Info);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
        assert_eq!(LogLevel::Critical.to_string(), "critical");
    }
}
