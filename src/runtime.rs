//! Censored run times
//!
//! A run either finished below the time limit (`Solved`) or it did not
//! (`Timeout`). `Timeout` orders after every solved time, so sorting a column
//! puts unsolved instances last.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Time limit used by the counter-game experiments (300 s)
pub const COUNTER_GAMES_TIMEOUT: TimeLimit = TimeLimit(300.0);

/// Time limit used by the robot-navigation experiments (1000 s)
pub const ROBOT_NAVIGATION_TIMEOUT: TimeLimit = TimeLimit(1000.0);

/// The externally imposed bound on a solver run.
///
/// A run counts as solved only when its elapsed time is strictly below the
/// limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TimeLimit(f64);

impl TimeLimit {
    /// Create a time limit.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `secs` is not finite and positive
    pub fn from_secs(secs: f64) -> Result<Self> {
        if secs.is_finite() && secs > 0.0 {
            Ok(Self(secs))
        } else {
            Err(Error::Config(format!(
                "time limit must be a positive number of seconds, got {secs}"
            )))
        }
    }

    /// Limit in seconds
    #[must_use]
    pub const fn as_secs(self) -> f64 {
        self.0
    }

    /// Classify an elapsed time against this limit.
    #[must_use]
    pub fn censor(self, elapsed: f64) -> RunTime {
        if elapsed < self.0 {
            RunTime::Solved(elapsed)
        } else {
            RunTime::Timeout
        }
    }
}

impl TryFrom<f64> for TimeLimit {
    type Error = Error;

    fn try_from(secs: f64) -> Result<Self> {
        Self::from_secs(secs)
    }
}

impl From<TimeLimit> for f64 {
    fn from(limit: TimeLimit) -> Self {
        limit.0
    }
}

/// Outcome of one (instance, variant) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTime {
    /// Finished in the given number of seconds, below the limit
    Solved(f64),
    /// No completed run below the limit was logged
    Timeout,
}

impl RunTime {
    /// True for `Solved`
    #[must_use]
    pub const fn is_solved(self) -> bool {
        matches!(self, Self::Solved(_))
    }

    /// Solved seconds, or `None` for a timeout
    #[must_use]
    pub const fn solved_secs(self) -> Option<f64> {
        match self {
            Self::Solved(secs) => Some(secs),
            Self::Timeout => None,
        }
    }

    /// Seconds with timeouts rendered as the limit itself.
    ///
    /// This is the value bar charts plot for censored runs.
    #[must_use]
    pub const fn secs_or_limit(self, limit: TimeLimit) -> f64 {
        match self {
            Self::Solved(secs) => secs,
            Self::Timeout => limit.as_secs(),
        }
    }
}

impl PartialOrd for RunTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Solved(a), Self::Solved(b)) => a.partial_cmp(b),
            (Self::Solved(_), Self::Timeout) => Some(Ordering::Less),
            (Self::Timeout, Self::Solved(_)) => Some(Ordering::Greater),
            (Self::Timeout, Self::Timeout) => Some(Ordering::Equal),
        }
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solved(secs) => write!(f, "{secs}"),
            Self::Timeout => f.write_str("timeout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_sorts_after_solved() {
        assert!(RunTime::Timeout > RunTime::Solved(299.9));
        assert!(RunTime::Solved(1e9) < RunTime::Timeout);
        assert!(RunTime::Solved(1.0) < RunTime::Solved(2.0));
    }

    #[test]
    fn test_censor_is_strict() {
        let limit = COUNTER_GAMES_TIMEOUT;
        assert_eq!(limit.censor(299.5), RunTime::Solved(299.5));
        assert_eq!(limit.censor(300.0), RunTime::Timeout);
        assert_eq!(limit.censor(512.0), RunTime::Timeout);
    }

    #[test]
    fn test_secs_or_limit() {
        let limit = TimeLimit::from_secs(1000.0).unwrap();
        assert!((RunTime::Timeout.secs_or_limit(limit) - 1000.0).abs() < f64::EPSILON);
        assert!((RunTime::Solved(4.25).secs_or_limit(limit) - 4.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        assert!(TimeLimit::from_secs(0.0).is_err());
        assert!(TimeLimit::from_secs(-1.0).is_err());
        assert!(TimeLimit::from_secs(f64::NAN).is_err());
        assert!(TimeLimit::from_secs(f64::INFINITY).is_err());
    }

    #[test]
    fn test_limit_deserializes_through_validation() {
        let limit: TimeLimit = serde_json::from_str("300.0").unwrap();
        assert!((limit.as_secs() - 300.0).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<TimeLimit>("-5.0").is_err());
    }
}
