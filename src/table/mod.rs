//! Comparison tables
//!
//! One row per instance key of the sweep, in declared order, with exactly one
//! run time per variant. A table is assembled by [`TableBuilder`] in a
//! single finalizing step and never changes afterwards; a different sweep
//! needs a new table.
//!
//! ## Resolution
//!
//! Each variant's records are indexed once ([`MatchIndex`]) against the match
//! specs of the whole sweep. With the `rayon` feature the variants are
//! indexed in parallel; rows are still emitted in sweep order and each
//! variant still honours its own file order.

use std::collections::HashSet;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::family::BenchmarkFamily;
use crate::matcher::{MatchIndex, MatchSpec};
use crate::record::RecordStore;
use crate::runtime::{RunTime, TimeLimit};
use crate::storage::SOLVED_BY_COLUMN;
use crate::sweep::SweepDomain;
use crate::{Error, InstanceKey, Result};

/// Run times of every variant for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    key: InstanceKey,
    times: Vec<(String, RunTime)>,
}

impl ComparisonRow {
    /// Create a row from `(variant, time)` pairs in column order.
    #[must_use]
    pub fn new(key: InstanceKey, times: Vec<(String, RunTime)>) -> Self {
        Self { key, times }
    }

    /// Get the instance key.
    #[must_use]
    pub const fn key(&self) -> &InstanceKey {
        &self.key
    }

    /// Run time of `variant`, if it is a column of this row.
    #[must_use]
    pub fn time(&self, variant: &str) -> Option<RunTime> {
        self.times
            .iter()
            .find(|(id, _)| id == variant)
            .map(|&(_, time)| time)
    }

    /// `(variant, time)` pairs in column order.
    pub fn times(&self) -> impl Iterator<Item = (&str, RunTime)> + '_ {
        self.times.iter().map(|(id, time)| (id.as_str(), *time))
    }

    /// Number of variants that solved this instance.
    #[must_use]
    pub fn solved_by(&self) -> usize {
        self.times.iter().filter(|(_, time)| time.is_solved()).count()
    }
}

/// Dense, immutable comparison of several variants over one sweep.
///
/// Deserializing re-checks the invariants [`TableBuilder::build`] guarantees:
/// unique variants and keys, one time per variant in column order, and solved
/// times within `[0, limit)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct ComparisonTable {
    name: String,
    limit: TimeLimit,
    variants: Vec<String>,
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Name of the family the table was built for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time limit timeouts were censored against.
    #[must_use]
    pub const fn limit(&self) -> TimeLimit {
        self.limit
    }

    /// Variant IDs in column order.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Rows in sweep order.
    #[must_use]
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    /// Iterate rows in sweep order.
    pub fn iter(&self) -> std::slice::Iter<'_, ComparisonRow> {
        self.rows.iter()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the sweep was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row of one instance.
    #[must_use]
    pub fn row(&self, key: &InstanceKey) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.key() == key)
    }

    /// Run times of one variant in sweep order.
    #[must_use]
    pub fn column(&self, variant: &str) -> Option<Vec<RunTime>> {
        let position = self.variants.iter().position(|id| id == variant)?;
        self.rows
            .iter()
            .map(|row| row.times.get(position).map(|&(_, time)| time))
            .collect()
    }
}

/// Serialized shape of a table, before validation.
#[derive(Deserialize)]
struct TableParts {
    name: String,
    limit: TimeLimit,
    variants: Vec<String>,
    rows: Vec<ComparisonRow>,
}

impl TryFrom<TableParts> for ComparisonTable {
    type Error = Error;

    fn try_from(parts: TableParts) -> Result<Self> {
        let TableParts {
            name,
            limit,
            variants,
            rows,
        } = parts;
        check_columns(&name, &variants, rows.iter().map(ComparisonRow::key))?;

        let mut keys = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !keys.insert(row.key()) {
                return Err(Error::Config(format!(
                    "table {name}: instance {} appears twice",
                    row.key()
                )));
            }
            if !row.times().map(|(id, _)| id).eq(variants.iter().map(String::as_str)) {
                return Err(Error::Config(format!(
                    "table {name}: instance {} does not have one time per variant",
                    row.key()
                )));
            }
            for (id, time) in row.times() {
                if let RunTime::Solved(secs) = time {
                    if !(0.0..limit.as_secs()).contains(&secs) {
                        return Err(Error::Config(format!(
                            "table {name}: {id} time {secs} for instance {} is outside [0, {})",
                            row.key(),
                            limit.as_secs()
                        )));
                    }
                }
            }
        }

        Ok(Self {
            name,
            limit,
            variants,
            rows,
        })
    }
}

impl<'a> IntoIterator for &'a ComparisonTable {
    type Item = &'a ComparisonRow;
    type IntoIter = std::slice::Iter<'a, ComparisonRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Builder for `ComparisonTable`.
///
/// Collects the variant stores and an optional explicit sweep, then resolves
/// everything in [`build`](Self::build).
#[derive(Debug)]
pub struct TableBuilder<'a> {
    family: &'a BenchmarkFamily,
    domain: Option<SweepDomain>,
    stores: Vec<&'a RecordStore>,
}

impl<'a> TableBuilder<'a> {
    /// Start a table for `family` over its declared sweep.
    #[must_use]
    pub const fn new(family: &'a BenchmarkFamily) -> Self {
        Self {
            family,
            domain: None,
            stores: Vec::new(),
        }
    }

    /// Replace the family's declared sweep with an explicit domain.
    #[must_use]
    pub fn domain(mut self, domain: SweepDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Add a variant column (columns keep insertion order).
    #[must_use]
    pub fn store(mut self, store: &'a RecordStore) -> Self {
        self.stores.push(store);
        self
    }

    /// Resolve every (instance, variant) pair and finalize the table.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no variant was added, a variant ID is
    /// repeated or shares its name with another export column, or a sweep
    /// key cannot be turned into a match spec. No partial table is ever
    /// returned.
    pub fn build(self) -> Result<ComparisonTable> {
        let variants: Vec<String> = self
            .stores
            .iter()
            .map(|store| store.variant().to_string())
            .collect();
        let domain = match self.domain {
            Some(domain) => domain,
            None => self.family.domain()?,
        };
        check_columns(self.family.name(), &variants, domain.iter())?;

        let specs = domain
            .iter()
            .map(|key| self.family.match_spec(key))
            .collect::<Result<Vec<MatchSpec>>>()?;

        let limit = self.family.limit();
        let columns = resolve_columns(&self.stores, &specs, limit);

        let rows: Vec<ComparisonRow> = domain
            .keys()
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let times = self
                    .stores
                    .iter()
                    .zip(&columns)
                    .map(|(store, column)| (store.variant().to_string(), column[i]))
                    .collect();
                ComparisonRow::new(key.clone(), times)
            })
            .collect();

        info!(
            family = self.family.name(),
            rows = rows.len(),
            variants = self.stores.len(),
            "built comparison table"
        );

        Ok(ComparisonTable {
            name: self.family.name().to_string(),
            limit,
            variants,
            rows,
        })
    }
}

/// Build the comparison table of `family` over `domain` from `stores`.
///
/// # Errors
///
/// See [`TableBuilder::build`]
///
/// # Example
///
/// ```rust
/// use mtsyft_results::family::presets;
/// use mtsyft_results::record::{RawRecord, RecordStore};
/// use mtsyft_results::sweep::SweepDomain;
/// use mtsyft_results::{table, InstanceKey, RunTime};
///
/// let family = presets::counter_tiers(8);
/// let store = RecordStore::from_records(
///     "MtSyft",
///     vec![RawRecord::new("counter_8", "core_80/envs_81", 12.5)],
/// );
/// let domain = SweepDomain::from_keys(vec![
///     InstanceKey::new().with("n", 80),
///     InstanceKey::new().with("n", 81),
/// ])?;
///
/// let table = table::build(&family, domain, &[store])?;
/// assert_eq!(table.column("MtSyft"), Some(vec![RunTime::Timeout, RunTime::Solved(12.5)]));
/// # Ok::<(), mtsyft_results::Error>(())
/// ```
pub fn build(
    family: &BenchmarkFamily,
    domain: SweepDomain,
    stores: &[RecordStore],
) -> Result<ComparisonTable> {
    stores
        .iter()
        .fold(TableBuilder::new(family).domain(domain), TableBuilder::store)
        .build()
}

/// Variant IDs must be present, unique, and distinct from the key parameter
/// and `solved_by` columns of the export.
fn check_columns<'k>(
    table: &str,
    variants: &[String],
    keys: impl IntoIterator<Item = &'k InstanceKey>,
) -> Result<()> {
    if variants.is_empty() {
        return Err(Error::Config(format!("comparison {table} has no variants")));
    }

    let mut reserved: HashSet<&str> = HashSet::from([SOLVED_BY_COLUMN]);
    for key in keys {
        reserved.extend(key.params().map(|(name, _)| name));
    }

    let mut seen = HashSet::with_capacity(variants.len());
    for variant in variants {
        if !seen.insert(variant.as_str()) {
            return Err(Error::Config(format!(
                "variant {variant} added twice to comparison {table}"
            )));
        }
        if reserved.contains(variant.as_str()) {
            return Err(Error::Config(format!(
                "variant {variant} of comparison {table} collides with a column of the same name"
            )));
        }
    }
    Ok(())
}

fn resolve_column(store: &RecordStore, specs: &[MatchSpec], limit: TimeLimit) -> Vec<RunTime> {
    let index = MatchIndex::build(specs, store.records());
    debug!(
        variant = store.variant(),
        records = store.len(),
        matched = index.matched(),
        keys = specs.len(),
        "resolved variant"
    );
    (0..specs.len()).map(|i| index.resolve(i, limit)).collect()
}

#[cfg(feature = "rayon")]
fn resolve_columns(
    stores: &[&RecordStore],
    specs: &[MatchSpec],
    limit: TimeLimit,
) -> Vec<Vec<RunTime>> {
    stores
        .par_iter()
        .map(|store| resolve_column(store, specs, limit))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn resolve_columns(
    stores: &[&RecordStore],
    specs: &[MatchSpec],
    limit: TimeLimit,
) -> Vec<Vec<RunTime>> {
    stores
        .iter()
        .map(|store| resolve_column(store, specs, limit))
        .collect()
}
