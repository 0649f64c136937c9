//! Benchmark families
//!
//! A family ties together everything needed to turn an instance key into a
//! match spec: the tag and path token templates, the matching policy, the
//! time limit and the declared sweep.
//!
//! ```text
//! InstanceKey {k: 3, n: 42}
//!    │  tag_template  "counter_{k}"  ──> "counter_3"
//!    │  path_template "{n}"          ──> "42"
//!    │  anchor        "core_1/"
//!    ▼
//! MatchSpec (SuffixExact)
//! ```

pub mod presets;
mod template;

use serde::{Deserialize, Serialize};

use crate::matcher::{MatchPolicy, MatchSpec};
use crate::runtime::TimeLimit;
use crate::sweep::{ParamRange, SweepDomain};
use crate::{Error, InstanceKey, Result};

/// Static description of one benchmark family comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkFamily {
    name: String,
    tag: String,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<String>,
    policy: MatchPolicy,
    timeout_secs: TimeLimit,
    sweep: Vec<ParamRange>,
}

impl BenchmarkFamily {
    /// Create a builder for a family.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> BenchmarkFamilyBuilder {
        BenchmarkFamilyBuilder::new(name)
    }

    /// Same family under another name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the family name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the tag token template.
    #[must_use]
    pub fn tag_template(&self) -> &str {
        &self.tag
    }

    /// Get the path token template.
    #[must_use]
    pub fn path_template(&self) -> &str {
        &self.path
    }

    /// Get the path anchor template, if any.
    #[must_use]
    pub fn anchor_template(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Get the matching policy.
    #[must_use]
    pub const fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Get the time limit.
    #[must_use]
    pub const fn limit(&self) -> TimeLimit {
        self.timeout_secs
    }

    /// Get the declared sweep ranges.
    #[must_use]
    pub fn sweep(&self) -> &[ParamRange] {
        &self.sweep
    }

    /// Enumerate the declared sweep.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the ranges are invalid
    pub fn domain(&self) -> Result<SweepDomain> {
        SweepDomain::from_ranges(&self.sweep)
    }

    /// Build the match spec of one instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a template is malformed or references a
    /// parameter the key does not have
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtsyft_results::family::presets;
    /// use mtsyft_results::InstanceKey;
    ///
    /// let family = presets::counter_coverage();
    /// let spec = family.match_spec(&InstanceKey::new().with("k", 3).with("n", 42))?;
    /// assert_eq!(spec.tag_token(), "counter_3");
    /// assert_eq!(spec.path_token(), "42");
    /// assert_eq!(spec.anchor(), Some("core_1/"));
    /// # Ok::<(), mtsyft_results::Error>(())
    /// ```
    pub fn match_spec(&self, key: &InstanceKey) -> Result<MatchSpec> {
        let spec = MatchSpec::new(
            template::render(&self.tag, key)?,
            template::render(&self.path, key)?,
            self.policy,
        );
        match &self.anchor {
            Some(anchor) => Ok(spec.with_anchor(template::render(anchor, key)?)),
            None => Ok(spec),
        }
    }

    /// Check that every template only references declared sweep parameters.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("benchmark family needs a name".to_string()));
        }
        self.domain()?;

        let templates = [Some(&self.tag), Some(&self.path), self.anchor.as_ref()];
        for template in templates.into_iter().flatten() {
            for name in template::placeholders(template)? {
                if !self.sweep.iter().any(|range| range.name == name) {
                    return Err(Error::Config(format!(
                        "family {}: template {template:?} references undeclared parameter {name}",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Builder for `BenchmarkFamily`.
#[derive(Debug)]
pub struct BenchmarkFamilyBuilder {
    name: String,
    tag: String,
    path: String,
    anchor: Option<String>,
    policy: MatchPolicy,
    timeout_secs: f64,
    sweep: Vec<ParamRange>,
}

impl BenchmarkFamilyBuilder {
    /// Create a new builder (containment policy, empty templates).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: String::new(),
            path: String::new(),
            anchor: None,
            policy: MatchPolicy::Containment,
            timeout_secs: crate::runtime::COUNTER_GAMES_TIMEOUT.as_secs(),
            sweep: Vec::new(),
        }
    }

    /// Set the tag token template, e.g. `counter_{k}`.
    #[must_use]
    pub fn tag(mut self, template: impl Into<String>) -> Self {
        self.tag = template.into();
        self
    }

    /// Set the path token template and the policy it is matched under.
    #[must_use]
    pub fn path(mut self, template: impl Into<String>, policy: MatchPolicy) -> Self {
        self.path = template.into();
        self.policy = policy;
        self
    }

    /// Require paths to also contain this (templated) anchor.
    #[must_use]
    pub fn anchor(mut self, template: impl Into<String>) -> Self {
        self.anchor = Some(template.into());
        self
    }

    /// Set the time limit in seconds.
    #[must_use]
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Append a sweep parameter (first added is the outermost loop).
    #[must_use]
    pub fn param(mut self, range: ParamRange) -> Self {
        self.sweep.push(range);
        self
    }

    /// Build and validate the family.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the time limit, sweep or templates are
    /// invalid
    pub fn build(self) -> Result<BenchmarkFamily> {
        let family = BenchmarkFamily {
            name: self.name,
            tag: self.tag,
            path: self.path,
            anchor: self.anchor,
            policy: self.policy,
            timeout_secs: TimeLimit::from_secs(self.timeout_secs)?,
            sweep: self.sweep,
        };
        family.validate()?;
        Ok(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_validates_placeholders() {
        let result = BenchmarkFamily::builder("bad")
            .tag("counter_{k}")
            .path("envs_{n}", MatchPolicy::Containment)
            .param(ParamRange::new("n", 1, 3))
            .build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("undeclared parameter k"));
    }

    #[test]
    fn test_builder_rejects_bad_limit() {
        let result = BenchmarkFamily::builder("bad")
            .tag("counter_1")
            .path("{n}", MatchPolicy::SuffixExact)
            .timeout_secs(0.0)
            .param(ParamRange::new("n", 1, 3))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_match_spec_renders_all_templates() {
        let family = BenchmarkFamily::builder("tiers")
            .tag("counter_{k}")
            .path("core_{core}/envs_{n}", MatchPolicy::Containment)
            .param(ParamRange::new("k", 8, 8))
            .param(ParamRange::new("core", 80, 80))
            .param(ParamRange::new("n", 80, 81))
            .build()
            .unwrap();

        let key = InstanceKey::new().with("k", 8).with("core", 80).with("n", 81);
        let spec = family.match_spec(&key).unwrap();
        assert_eq!(spec, MatchSpec::containment("counter_8", "core_80/envs_81"));
        assert_eq!(family.domain().unwrap().len(), 2);
    }

    #[test]
    fn test_family_json_shape() {
        let json = r#"{
            "name": "table-1",
            "tag": "counter_{k}",
            "path": "{n}",
            "anchor": "core_1/",
            "policy": "suffix_exact",
            "timeout_secs": 300.0,
            "sweep": [
                {"name": "k", "start": 1, "end": 10},
                {"name": "n", "start": 1, "end": 100}
            ]
        }"#;
        let family: BenchmarkFamily = serde_json::from_str(json).unwrap();
        family.validate().unwrap();
        assert_eq!(family, presets::counter_coverage().with_name("table-1"));
    }
}
