//! Raw Record - one logged solver run

use serde::{Deserialize, Serialize};

/// Raw Record is a single row of a variant's timing log.
///
/// The solvers append `goal_file,env_file,running_time` after every run that
/// finishes, so the tag is the agent goal path and the path is the
/// environment-tier file. Runs killed by the external time bound leave no
/// row at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    tag: String,
    path: String,
    elapsed: f64,
}

impl RawRecord {
    /// Create a new raw record.
    ///
    /// # Arguments
    ///
    /// * `tag` - Identifier of the instance family/category (goal file)
    /// * `path` - Instance path (environment file)
    /// * `elapsed` - Wall-clock seconds of the run
    #[must_use]
    pub fn new(tag: impl Into<String>, path: impl Into<String>, elapsed: f64) -> Self {
        Self {
            tag: tag.into(),
            path: path.into(),
            elapsed,
        }
    }

    /// Get the tag field.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the instance path field.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the elapsed seconds.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_new() {
        let record = RawRecord::new("counter_8/goal.ltlf", "core_80/envs_81", 12.5);
        assert_eq!(record.tag(), "counter_8/goal.ltlf");
        assert_eq!(record.path(), "core_80/envs_81");
        assert!((record.elapsed() - 12.5).abs() < f64::EPSILON);
    }
}
