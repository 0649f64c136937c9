//! # mtsyft-results: benchmark comparison for MtSyft solver variants
//!
//! Each solver variant appends one `tag,path,elapsed` row per run to its own
//! timing log. This crate matches those rows against the instances of a
//! benchmark family, builds a dense comparison table (one run time per
//! instance and variant, timeouts explicit) and reduces it to coverage and
//! average-runtime statistics.
//!
//! ## Pipeline
//!
//! ```text
//! RecordStore (per variant) ──> MatchIndex ──> ComparisonTable ──> CoverageReport
//!                                                    │
//!                                                    └──> Arrow / Parquet
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mtsyft_results::family::presets;
//! use mtsyft_results::Comparison;
//!
//! let comparison = Comparison::builder(presets::counter_coverage())
//!     .variant("MtSyft", "res_mtsyft.csv")
//!     .variant("cb-MtSyft", "res_cb_mtsyft.csv")
//!     .group_by("k")
//!     .run()?;
//!
//! for (k, variant, stat) in comparison.coverage()?.iter() {
//!     println!("k={k} {variant}: {}/{} avg {:.2}", stat.solved, stat.instances, stat.avg_runtime);
//! }
//! # Ok::<(), mtsyft_results::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod family;
pub mod instance;
pub mod matcher;
pub mod record;
pub mod runtime;
pub mod stats;
pub mod storage;
pub mod sweep;
pub mod table;

use std::path::PathBuf;

use tracing::info;

pub use error::{Error, Result};
pub use instance::InstanceKey;
pub use runtime::{RunTime, TimeLimit};

use config::ComparisonConfig;
use error::MalformedRecordError;
use family::BenchmarkFamily;
use record::RecordStore;
use stats::{CoverageReport, StatisticsReducer};
use sweep::SweepDomain;
use table::{ComparisonTable, TableBuilder};

/// A finished comparison: the table plus what was learned while loading.
#[derive(Debug, Clone)]
pub struct Comparison {
    table: ComparisonTable,
    rejected: Vec<MalformedRecordError>,
    group_by: Option<String>,
}

impl Comparison {
    /// Create a comparison builder for `family`
    #[must_use]
    pub fn builder(family: BenchmarkFamily) -> ComparisonBuilder {
        ComparisonBuilder::new(family)
    }

    /// Load every log named by `config` and build its table.
    ///
    /// # Errors
    ///
    /// See [`ComparisonBuilder::run`]
    pub fn from_config(config: ComparisonConfig) -> Result<Self> {
        config.validate()?;
        let ComparisonConfig {
            name,
            family,
            variants,
            group_by,
        } = config;

        let mut builder = Self::builder(family.with_name(name));
        for source in variants {
            builder = builder.variant(source.id, source.log);
        }
        if let Some(param) = group_by {
            builder = builder.group_by(param);
        }
        builder.run()
    }

    /// Get the comparison table
    #[must_use]
    pub const fn table(&self) -> &ComparisonTable {
        &self.table
    }

    /// Take the comparison table
    #[must_use]
    pub fn into_table(self) -> ComparisonTable {
        self.table
    }

    /// Rows excluded from the variant logs, in variant order then file order
    #[must_use]
    pub fn rejected(&self) -> &[MalformedRecordError] {
        &self.rejected
    }

    /// Coverage grouped by the configured parameter.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no grouping parameter was set or some
    /// instance lacks it
    pub fn coverage(&self) -> Result<CoverageReport<i64>> {
        let param = self.group_by.as_deref().ok_or_else(|| {
            Error::Config(format!("comparison {} has no group_by parameter", self.table.name()))
        })?;
        self.coverage_by(param)
    }

    /// Coverage grouped by any key parameter.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if some instance lacks `param`
    pub fn coverage_by(&self, param: &str) -> Result<CoverageReport<i64>> {
        StatisticsReducer::reduce_by_param(&self.table, param)
    }
}

/// Builder for `Comparison`
#[derive(Debug)]
pub struct ComparisonBuilder {
    family: BenchmarkFamily,
    variants: Vec<(String, PathBuf)>,
    domain: Option<SweepDomain>,
    group_by: Option<String>,
    strict: bool,
}

impl ComparisonBuilder {
    /// Create a builder with no variants over the family's declared sweep
    #[must_use]
    pub const fn new(family: BenchmarkFamily) -> Self {
        Self {
            family,
            variants: Vec::new(),
            domain: None,
            group_by: None,
            strict: false,
        }
    }

    /// Add a variant column read from `log`
    #[must_use]
    pub fn variant(mut self, id: impl Into<String>, log: impl Into<PathBuf>) -> Self {
        self.variants.push((id.into(), log.into()));
        self
    }

    /// Compare over an explicit domain instead of the declared sweep
    #[must_use]
    pub fn domain(mut self, domain: SweepDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Parameter [`Comparison::coverage`] groups by
    #[must_use]
    pub fn group_by(mut self, param: impl Into<String>) -> Self {
        self.group_by = Some(param.into());
        self
    }

    /// Fail on the first malformed log row instead of excluding it
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Load every variant log, then resolve the table.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingSource` for the first log that cannot be
    /// opened, `Error::MalformedRecord` in strict mode, and `Error::Config`
    /// for an invalid family, variant set or grouping parameter
    pub fn run(self) -> Result<Comparison> {
        self.family.validate()?;
        if let Some(param) = &self.group_by {
            if !self.family.sweep().iter().any(|range| &range.name == param)
                && self.domain.is_none()
            {
                return Err(Error::Config(format!(
                    "comparison {}: group_by {param} is not a sweep parameter",
                    self.family.name()
                )));
            }
        }

        let stores = self
            .variants
            .iter()
            .map(|(id, log)| RecordStore::load(id.as_str(), log))
            .collect::<Result<Vec<_>>>()?;
        if self.strict {
            for store in &stores {
                store.ensure_clean()?;
            }
        }

        let mut builder = TableBuilder::new(&self.family);
        if let Some(domain) = self.domain {
            builder = builder.domain(domain);
        }
        let table = stores
            .iter()
            .fold(builder, TableBuilder::store)
            .build()?;

        let rejected: Vec<MalformedRecordError> = stores
            .iter()
            .flat_map(|store| store.rejected().iter().cloned())
            .collect();
        info!(
            comparison = table.name(),
            rows = table.len(),
            rejected = rejected.len(),
            "comparison ready"
        );

        Ok(Comparison {
            table,
            rejected,
            group_by: self.group_by,
        })
    }
}
