//! JSON comparison configuration
//!
//! ```json
//! {
//!   "name": "table-2",
//!   "family": { "name": "robot-navigation", "tag": "rooms_{rooms}", ... },
//!   "variants": [
//!     {"id": "MtSyft", "log": "res_mtsyft.csv"},
//!     {"id": "cb-MtSyft", "log": "res_cb_mtsyft.csv"}
//!   ],
//!   "group_by": "rooms"
//! }
//! ```
//!
//! Relative `log` paths are resolved against the directory of the config
//! file, so a config can sit next to the logs it describes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::family::BenchmarkFamily;
use crate::{Error, Result};

/// One solver variant and the log it wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSource {
    /// Column name in the comparison
    pub id: String,
    /// Path of the timing log
    pub log: PathBuf,
}

/// A complete, validated comparison description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Name of the comparison (e.g. the figure or table it feeds)
    pub name: String,
    /// Family that defines the sweep and matching rules
    pub family: BenchmarkFamily,
    /// Variant columns, in output order
    pub variants: Vec<VariantSource>,
    /// Sweep parameter coverage is grouped by, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl ComparisonConfig {
    /// Parse and validate a config. Log paths are kept as written.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON, `Error::Config` if the
    /// family, variant list or grouping parameter is invalid
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file, resolving relative log paths against its
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json_str(&fs::read_to_string(path)?)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for variant in &mut config.variants {
            if variant.log.is_relative() {
                variant.log = base.join(&variant.log);
            }
        }

        debug!(
            config = %path.display(),
            name = %config.name,
            variants = config.variants.len(),
            "loaded comparison config"
        );
        Ok(config)
    }

    /// Check the family, the variant IDs and the grouping parameter.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        self.family.validate()?;

        if self.variants.is_empty() {
            return Err(Error::Config(format!(
                "comparison {} lists no variants",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for variant in &self.variants {
            if variant.id.trim().is_empty() {
                return Err(Error::Config(format!(
                    "comparison {}: variant with empty id",
                    self.name
                )));
            }
            if !seen.insert(variant.id.as_str()) {
                return Err(Error::Config(format!(
                    "comparison {}: duplicate variant id {}",
                    self.name, variant.id
                )));
            }
        }

        if let Some(param) = &self.group_by {
            if !self.family.sweep().iter().any(|range| &range.name == param) {
                return Err(Error::Config(format!(
                    "comparison {}: group_by {param} is not a sweep parameter",
                    self.name
                )));
            }
        }
        Ok(())
    }
}
