//! Instance keys - one point of a benchmark family's parameter sweep

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier of one benchmark instance.
///
/// A key is an ordered list of named integer parameters, e.g.
/// `{k: 8, n: 81}` for counter games or `{rooms: 4, n: 2}` for robot
/// navigation. Two keys are equal iff they have the same parameters with the
/// same values in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceKey {
    params: Vec<(String, i64)>,
}

impl InstanceKey {
    /// Create an empty key.
    #[must_use]
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter, or overwrite its value if the name is already set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtsyft_results::InstanceKey;
    ///
    /// let key = InstanceKey::new().with("k", 8).with("n", 81);
    /// assert_eq!(key.get("n"), Some(81));
    /// assert_eq!(key.to_string(), "k=8, n=81");
    /// ```
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
        let name = name.into();
        match self.params.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Value of a named parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|&(_, value)| value)
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.params.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True if the key has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
