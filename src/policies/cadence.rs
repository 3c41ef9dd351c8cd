//! # Sampling cadence.
//!
//! [`Cadence`] decides how long the sampler waits before its next firing.
//! The adaptive schedule samples often while a run is young and backs off as it ages:
//!
//! | firings so far | next interval |
//! |----------------|---------------|
//! | `< 10`         | 10s           |
//! | `10..50`       | 30s           |
//! | `>= 50`        | 60s           |
//!
//! A [`Cadence::Fixed`] override ignores the count entirely; it never goes below
//! [`Cadence::MIN`].
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use labvisor::Cadence;
//!
//! let adaptive = Cadence::Adaptive;
//! assert_eq!(adaptive.next(0), Duration::from_secs(10));
//! assert_eq!(adaptive.next(10), Duration::from_secs(30));
//! assert_eq!(adaptive.next(50), Duration::from_secs(60));
//!
//! let fixed = Cadence::Fixed(Duration::from_secs(5));
//! assert_eq!(fixed.next(1_000), Duration::from_secs(5));
//! ```

use std::time::Duration;

/// Firing count at which the adaptive schedule switches to [`Cadence::MEDIUM`].
pub const MEDIUM_AFTER: u64 = 10;
/// Firing count at which the adaptive schedule switches to [`Cadence::SLOW`].
pub const SLOW_AFTER: u64 = 50;

/// Interval policy for the sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cadence {
    /// Interval grows with the number of firings (default).
    #[default]
    Adaptive,
    /// Same interval regardless of the number of firings.
    ///
    /// Intervals shorter than [`Cadence::MIN`] are raised to it.
    Fixed(Duration),
}

impl Cadence {
    /// Interval while fewer than [`MEDIUM_AFTER`] firings happened.
    pub const FAST: Duration = Duration::from_secs(10);
    /// Interval between [`MEDIUM_AFTER`] and [`SLOW_AFTER`] firings.
    pub const MEDIUM: Duration = Duration::from_secs(30);
    /// Interval after [`SLOW_AFTER`] firings.
    pub const SLOW: Duration = Duration::from_secs(60);
    /// Floor applied to fixed intervals.
    pub const MIN: Duration = Duration::from_millis(100);

    /// Computes the delay before the next firing, given how many firings already completed.
    pub fn next(&self, count: u64) -> Duration {
        match *self {
            Cadence::Fixed(interval) => interval.max(Self::MIN),
            Cadence::Adaptive if count < MEDIUM_AFTER => Self::FAST,
            Cadence::Adaptive if count < SLOW_AFTER => Self::MEDIUM,
            Cadence::Adaptive => Self::SLOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_boundaries() {
        let cadence = Cadence::Adaptive;
        assert_eq!(cadence.next(9), Duration::from_secs(10));
        assert_eq!(cadence.next(10), Duration::from_secs(30));
        assert_eq!(cadence.next(49), Duration::from_secs(30));
        assert_eq!(cadence.next(50), Duration::from_secs(60));
        assert_eq!(cadence.next(u64::MAX), Duration::from_secs(60));
    }

    #[test]
    fn adaptive_schedule_totals() {
        let cadence = Cadence::Adaptive;
        let fast: Duration = (0..10).map(|c| cadence.next(c)).sum();
        let medium: Duration = (10..50).map(|c| cadence.next(c)).sum();
        assert_eq!(fast, Duration::from_secs(100));
        assert_eq!(medium, Duration::from_secs(1_200));
    }

    #[test]
    fn fixed_ignores_count() {
        let cadence = Cadence::Fixed(Duration::from_millis(250));
        for count in [0, 9, 10, 49, 50, 10_000] {
            assert_eq!(
                cadence.next(count),
                Duration::from_millis(250),
                "count {} should use the override",
                count
            );
        }
    }

    #[test]
    fn fixed_interval_has_a_floor() {
        assert_eq!(Cadence::Fixed(Duration::ZERO).next(3), Cadence::MIN);
        assert_eq!(Cadence::Fixed(Duration::from_millis(20)).next(0), Cadence::MIN);
        assert_eq!(
            Cadence::Fixed(Cadence::MIN).next(0),
            Duration::from_millis(100)
        );
    }
}
