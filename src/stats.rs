//! Coverage and average runtime per group
//!
//! Timeouts are censored data: they count towards a group's size but never
//! towards its average. A variant that solved nothing in a group reports an
//! average of `0.0`, which is what the published tables print.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::table::{ComparisonRow, ComparisonTable};
use crate::{Error, InstanceKey, Result};

/// Coverage of one variant within one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    /// Instances solved below the time limit
    pub solved: usize,
    /// Instances in the group
    pub instances: usize,
    /// Mean of the solved times, `0.0` when nothing was solved
    pub avg_runtime: f64,
}

impl CoverageStat {
    /// Compute the statistic from a group's solved times and its size.
    ///
    /// Times are summed in ascending order so the result does not depend on
    /// the order rows arrived in.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_solved(mut solved_times: Vec<f64>, instances: usize) -> Self {
        solved_times.sort_by(f64::total_cmp);
        let solved = solved_times.len();
        let avg_runtime = if solved == 0 {
            0.0
        } else {
            solved_times.iter().sum::<f64>() / solved as f64
        };

        Self {
            solved,
            instances,
            avg_runtime,
        }
    }
}

/// Coverage statistics per group, then per variant.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport<G: Ord> {
    stats: BTreeMap<G, BTreeMap<String, CoverageStat>>,
}

impl<G: Ord + Clone> CoverageReport<G> {
    /// Statistic of one variant in one group.
    #[must_use]
    pub fn get(&self, group: &G, variant: &str) -> Option<&CoverageStat> {
        self.stats.get(group)?.get(variant)
    }

    /// Entries ordered by group, then variant ID.
    pub fn iter(&self) -> impl Iterator<Item = (&G, &str, &CoverageStat)> + '_ {
        self.stats.iter().flat_map(|(group, variants)| {
            variants
                .iter()
                .map(move |(variant, stat)| (group, variant.as_str(), stat))
        })
    }

    /// Distinct groups in ascending order.
    #[must_use]
    pub fn groups(&self) -> Vec<G> {
        self.stats.keys().cloned().collect()
    }

    /// Number of `(group, variant)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.values().map(BTreeMap::len).sum()
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.values().all(BTreeMap::is_empty)
    }
}

/// Partition rows into groups and compute per-variant coverage.
pub struct StatisticsReducer;

impl StatisticsReducer {
    /// Reduce `rows` grouped by `group_by(key)`.
    ///
    /// Every variant present in a group's rows gets an entry for that group,
    /// even if it solved nothing there.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtsyft_results::stats::StatisticsReducer;
    /// use mtsyft_results::table::ComparisonRow;
    /// use mtsyft_results::{InstanceKey, RunTime};
    ///
    /// let row = |n, time| {
    ///     let key = InstanceKey::new().with("k", 1).with("n", n);
    ///     ComparisonRow::new(key, vec![("A".to_string(), time)])
    /// };
    /// let rows = [
    ///     row(1, RunTime::Solved(12.5)),
    ///     row(2, RunTime::Timeout),
    ///     row(3, RunTime::Solved(30.0)),
    /// ];
    ///
    /// let report = StatisticsReducer::reduce(&rows, |key| key.get("k"));
    /// let stat = report.get(&Some(1), "A").unwrap();
    /// assert_eq!(stat.solved, 2);
    /// assert!((stat.avg_runtime - 21.25).abs() < f64::EPSILON);
    /// ```
    pub fn reduce<'a, G, F, I>(rows: I, group_by: F) -> CoverageReport<G>
    where
        G: Ord,
        F: Fn(&InstanceKey) -> G,
        I: IntoIterator<Item = &'a ComparisonRow>,
    {
        let mut groups: BTreeMap<G, BTreeMap<String, (Vec<f64>, usize)>> = BTreeMap::new();

        for row in rows {
            let group = groups.entry(group_by(row.key())).or_default();
            for (variant, time) in row.times() {
                let entry = group.entry(variant.to_string()).or_default();
                if let Some(secs) = time.solved_secs() {
                    entry.0.push(secs);
                }
                entry.1 += 1;
            }
        }

        let stats = groups
            .into_iter()
            .map(|(group, variants)| {
                let variants = variants
                    .into_iter()
                    .map(|(variant, (solved, instances))| {
                        (variant, CoverageStat::from_solved(solved, instances))
                    })
                    .collect();
                (group, variants)
            })
            .collect();
        CoverageReport { stats }
    }

    /// Reduce a table grouped by one of its key parameters.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if some row's key lacks `param`
    pub fn reduce_by_param(table: &ComparisonTable, param: &str) -> Result<CoverageReport<i64>> {
        if let Some(row) = table.iter().find(|row| row.key().get(param).is_none()) {
            return Err(Error::Config(format!(
                "cannot group {} by {param}: instance {} has no such parameter",
                table.name(),
                row.key()
            )));
        }
        // Every key has `param` at this point.
        Ok(Self::reduce(table, |key| key.get(param).unwrap_or_default()))
    }
}
