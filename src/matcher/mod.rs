//! Instance matching
//!
//! Resolves an instance key's time from a variant's raw records. A record
//! matches when its tag contains the family's tag token and its path
//! satisfies the family's policy:
//!
//! - [`MatchPolicy::Containment`]: the path contains the composed token,
//!   e.g. `core_80/envs_83`.
//! - [`MatchPolicy::SuffixExact`]: the path ends with the token, e.g. `3`.
//!   Used where a small numeral would otherwise collide (`envs_1` is a
//!   substring of `envs_10`).
//!
//! The first matching record in stored order wins; no match means the run
//! timed out.

mod index;

pub use index::MatchIndex;

use serde::{Deserialize, Serialize};

use crate::record::RawRecord;
use crate::runtime::{RunTime, TimeLimit};

/// How a record's path is compared with the path token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Path contains the token anywhere
    Containment,
    /// Path ends with the token
    SuffixExact,
}

/// Tokens a record must satisfy to count as a run of one instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSpec {
    tag_token: String,
    path_token: String,
    anchor: Option<String>,
    policy: MatchPolicy,
}

impl MatchSpec {
    /// Create a match spec.
    ///
    /// # Arguments
    ///
    /// * `tag_token` - Substring the record tag must contain
    /// * `path_token` - Token compared with the record path under `policy`
    /// * `policy` - Containment or suffix-exact comparison
    #[must_use]
    pub fn new(
        tag_token: impl Into<String>,
        path_token: impl Into<String>,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            tag_token: tag_token.into(),
            path_token: path_token.into(),
            anchor: None,
            policy,
        }
    }

    /// Spec under the containment policy.
    #[must_use]
    pub fn containment(tag_token: impl Into<String>, path_token: impl Into<String>) -> Self {
        Self::new(tag_token, path_token, MatchPolicy::Containment)
    }

    /// Spec under the suffix-exact policy.
    #[must_use]
    pub fn suffix_exact(tag_token: impl Into<String>, path_suffix: impl Into<String>) -> Self {
        Self::new(tag_token, path_suffix, MatchPolicy::SuffixExact)
    }

    /// Additionally require the path to contain `anchor`.
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Get the tag token.
    #[must_use]
    pub fn tag_token(&self) -> &str {
        &self.tag_token
    }

    /// Get the path token.
    #[must_use]
    pub fn path_token(&self) -> &str {
        &self.path_token
    }

    /// Get the path anchor, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Get the matching policy.
    #[must_use]
    pub const fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// True if `record` is a run of this instance.
    #[must_use]
    pub fn matches(&self, record: &RawRecord) -> bool {
        self.matches_tag(record.tag()) && self.matches_path(record.path())
    }

    fn matches_tag(&self, tag: &str) -> bool {
        tag.contains(self.tag_token.as_str())
    }

    fn matches_path(&self, path: &str) -> bool {
        let anchored = self
            .anchor
            .as_deref()
            .map_or(true, |anchor| path.contains(anchor));

        anchored
            && match self.policy {
                MatchPolicy::Containment => path.contains(self.path_token.as_str()),
                MatchPolicy::SuffixExact => path.ends_with(self.path_token.as_str()),
            }
    }
}

/// Elapsed time of the first record matching `spec`, in stored order.
#[must_use]
pub fn first_match(spec: &MatchSpec, records: &[RawRecord]) -> Option<f64> {
    records
        .iter()
        .find(|record| spec.matches(record))
        .map(RawRecord::elapsed)
}

/// Resolve the run time of one instance for one variant.
///
/// Scans `records` in order and censors the first match against `limit`;
/// without a match the result is [`RunTime::Timeout`].
///
/// # Example
///
/// ```rust
/// use mtsyft_results::matcher::{resolve, MatchSpec};
/// use mtsyft_results::record::RawRecord;
/// use mtsyft_results::{RunTime, TimeLimit};
///
/// let records = vec![RawRecord::new("counter_8", "core_80/envs_81", 12.5)];
/// let limit = TimeLimit::from_secs(300.0)?;
///
/// let hit = MatchSpec::containment("counter_8", "core_80/envs_81");
/// let miss = MatchSpec::containment("counter_8", "core_80/envs_80");
/// assert_eq!(resolve(&hit, &records, limit), RunTime::Solved(12.5));
/// assert_eq!(resolve(&miss, &records, limit), RunTime::Timeout);
/// # Ok::<(), mtsyft_results::Error>(())
/// ```
#[must_use]
pub fn resolve(spec: &MatchSpec, records: &[RawRecord], limit: TimeLimit) -> RunTime {
    first_match(spec, records).map_or(RunTime::Timeout, |elapsed| limit.censor(elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit() -> TimeLimit {
        TimeLimit::from_secs(300.0).unwrap()
    }

    #[test]
    fn test_no_match_is_timeout() {
        let records = vec![RawRecord::new("counter_8", "core_80/envs_81", 12.5)];
        let spec = MatchSpec::containment("counter_2", "core_80/envs_81");
        assert_eq!(resolve(&spec, &records, limit()), RunTime::Timeout);
        assert_eq!(resolve(&spec, &[], limit()), RunTime::Timeout);
    }

    #[test]
    fn test_first_match_wins_regardless_of_value() {
        let records = vec![
            RawRecord::new("counter_8", "core_80/envs_90", 1.0),
            RawRecord::new("counter_8", "core_80/envs_81", 250.0),
            RawRecord::new("counter_8", "core_80/envs_81", 2.0),
        ];
        let spec = MatchSpec::containment("counter_8", "core_80/envs_81");
        assert_eq!(resolve(&spec, &records, limit()), RunTime::Solved(250.0));
    }

    #[test]
    fn test_suffix_exact_avoids_numeral_collision() {
        let records = vec![RawRecord::new("counter_3", "core_1/envs_1", 4.0)];
        let ten = MatchSpec::suffix_exact("counter_3", "10").with_anchor("core_1/");
        let one = MatchSpec::suffix_exact("counter_3", "1").with_anchor("core_1/");

        assert_eq!(resolve(&ten, &records, limit()), RunTime::Timeout);
        assert_eq!(resolve(&one, &records, limit()), RunTime::Solved(4.0));
    }

    #[test]
    fn test_containment_requires_the_composed_token() {
        let records = vec![RawRecord::new("counter_8", "core_80/envs_8", 4.0)];
        let spec = MatchSpec::containment("counter_8", "core_80/envs_83");
        assert_eq!(resolve(&spec, &records, limit()), RunTime::Timeout);
    }

    #[test]
    fn test_containment_is_a_plain_substring_test() {
        // envs_1 is a prefix of envs_10: containment accepts it
        let records = vec![RawRecord::new("rooms_10", "maps/envs_10", 8.0)];
        let spec = MatchSpec::containment("rooms_10", "envs_1");
        assert_eq!(resolve(&spec, &records, limit()), RunTime::Solved(8.0));
    }

    #[test]
    fn test_anchor_is_required() {
        let records = vec![RawRecord::new("counter_3", "core_2/envs_5", 4.0)];
        let spec = MatchSpec::suffix_exact("counter_3", "5").with_anchor("core_1/");
        assert_eq!(resolve(&spec, &records, limit()), RunTime::Timeout);
    }

    #[test]
    fn test_match_at_or_above_limit_is_censored() {
        let records = vec![RawRecord::new("counter_8", "core_80/envs_81", 300.0)];
        let spec = MatchSpec::containment("counter_8", "core_80/envs_81");
        assert_eq!(resolve(&spec, &records, limit()), RunTime::Timeout);
    }

    #[test]
    fn test_censored_first_match_still_shadows_later_rows() {
        let records = vec![
            RawRecord::new("counter_8", "core_80/envs_81", 301.0),
            RawRecord::new("counter_8", "core_80/envs_81", 5.0),
        ];
        let spec = MatchSpec::containment("counter_8", "core_80/envs_81");
        assert_eq!(resolve(&spec, &records, limit()), RunTime::Timeout);
    }
}
