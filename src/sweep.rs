//! Sweep domains - the ordered set of instance keys a comparison covers
//!
//! A sweep is declared as inclusive integer ranges, one per parameter. The
//! domain is the nested-loop enumeration of those ranges with the first
//! parameter outermost. A range may end at the value of an earlier
//! parameter, which gives the triangular sweeps of the robot-navigation
//! family (`n ∈ 1..=rooms`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, InstanceKey, Result};

/// Upper bound of a parameter range (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeEnd {
    /// Fixed value
    Fixed(i64),
    /// Current value of an earlier parameter
    Param(String),
}

/// Inclusive range of one sweep parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Parameter name, as used in token templates
    pub name: String,
    /// First value
    pub start: i64,
    /// Last value (inclusive)
    pub end: RangeEnd,
}

impl ParamRange {
    /// Range `start..=end`.
    #[must_use]
    pub fn new(name: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            name: name.into(),
            start,
            end: RangeEnd::Fixed(end),
        }
    }

    /// Range `start..=<value of param>`.
    #[must_use]
    pub fn up_to(name: impl Into<String>, start: i64, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start,
            end: RangeEnd::Param(param.into()),
        }
    }
}

/// Ordered, duplicate-free set of instance keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepDomain {
    keys: Vec<InstanceKey>,
}

impl SweepDomain {
    /// Enumerate the cross product of `ranges`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `ranges` is empty, a parameter name is
    /// repeated, or a range ends at a parameter that is not declared before
    /// it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtsyft_results::sweep::{ParamRange, SweepDomain};
    ///
    /// let domain = SweepDomain::from_ranges(&[
    ///     ParamRange::new("rooms", 2, 3),
    ///     ParamRange::up_to("n", 1, "rooms"),
    /// ])?;
    /// let keys: Vec<String> = domain.iter().map(ToString::to_string).collect();
    /// assert_eq!(keys[..3], ["rooms=2, n=1", "rooms=2, n=2", "rooms=3, n=1"]);
    /// assert_eq!(keys.len(), 5);
    /// # Ok::<(), mtsyft_results::Error>(())
    /// ```
    pub fn from_ranges(ranges: &[ParamRange]) -> Result<Self> {
        if ranges.is_empty() {
            return Err(Error::Config("sweep declares no parameters".to_string()));
        }

        let mut declared: HashSet<&str> = HashSet::new();
        for range in ranges {
            if let RangeEnd::Param(bound) = &range.end {
                if !declared.contains(bound.as_str()) {
                    return Err(Error::Config(format!(
                        "range of {} ends at {bound}, which is not declared before it",
                        range.name
                    )));
                }
            }
            if !declared.insert(range.name.as_str()) {
                return Err(Error::Config(format!(
                    "sweep parameter {} declared twice",
                    range.name
                )));
            }
        }

        let mut keys = Vec::new();
        expand(ranges, &InstanceKey::new(), &mut keys)?;
        Ok(Self { keys })
    }

    /// Use an explicit list of keys, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a key appears twice
    pub fn from_keys(keys: Vec<InstanceKey>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(keys.len());
        for key in &keys {
            if !seen.insert(key) {
                return Err(Error::Config(format!("instance {key} listed twice")));
            }
        }
        Ok(Self { keys })
    }

    /// Keys in declared order.
    #[must_use]
    pub fn keys(&self) -> &[InstanceKey] {
        &self.keys
    }

    /// Iterate keys in declared order.
    pub fn iter(&self) -> std::slice::Iter<'_, InstanceKey> {
        self.keys.iter()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if the domain has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<'a> IntoIterator for &'a SweepDomain {
    type Item = &'a InstanceKey;
    type IntoIter = std::slice::Iter<'a, InstanceKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

fn expand(ranges: &[ParamRange], prefix: &InstanceKey, out: &mut Vec<InstanceKey>) -> Result<()> {
    let Some((range, rest)) = ranges.split_first() else {
        out.push(prefix.clone());
        return Ok(());
    };

    let end = match &range.end {
        RangeEnd::Fixed(end) => *end,
        RangeEnd::Param(bound) => prefix.get(bound).ok_or_else(|| {
            Error::Config(format!("range of {} ends at unknown {bound}", range.name))
        })?,
    };

    for value in range.start..=end {
        expand(rest, &prefix.clone().with(range.name.as_str(), value), out)?;
    }
    Ok(())
}
