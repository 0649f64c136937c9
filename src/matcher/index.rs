//! Single-pass first-match index
//!
//! Resolving every key with its own scan costs keys × records. The index
//! walks a variant's records once, in stored order, and settles each spec at
//! its first matching record. A spec is never revisited once settled, so
//! duplicates further down the log cannot override the first match.

use super::MatchSpec;
use crate::record::RawRecord;
use crate::runtime::{RunTime, TimeLimit};

/// First-match elapsed times of a list of specs over one variant's records.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchIndex {
    first: Vec<Option<f64>>,
}

impl MatchIndex {
    /// Build the index in one pass over `records`.
    ///
    /// The pass ends early once every spec has a match.
    #[must_use]
    pub fn build(specs: &[MatchSpec], records: &[RawRecord]) -> Self {
        // Distinct tag tokens are tested once per record, not once per spec.
        let mut tag_tokens: Vec<&str> = Vec::new();
        let spec_tag: Vec<usize> = specs
            .iter()
            .map(|spec| {
                tag_tokens
                    .iter()
                    .position(|token| *token == spec.tag_token())
                    .unwrap_or_else(|| {
                        tag_tokens.push(spec.tag_token());
                        tag_tokens.len() - 1
                    })
            })
            .collect();

        let mut first = vec![None; specs.len()];
        let mut pending: Vec<usize> = (0..specs.len()).collect();
        let mut tag_hits = vec![false; tag_tokens.len()];

        for record in records {
            if pending.is_empty() {
                break;
            }

            for (hit, token) in tag_hits.iter_mut().zip(&tag_tokens) {
                *hit = record.tag().contains(token);
            }

            pending.retain(|&i| {
                let settled = tag_hits[spec_tag[i]] && specs[i].matches_path(record.path());
                if settled {
                    first[i] = Some(record.elapsed());
                }
                !settled
            });
        }

        Self { first }
    }

    /// Number of indexed specs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// True if no spec was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// First-match elapsed time of the spec at `position`.
    ///
    /// Returns `None` if the spec had no match or `position` is out of range.
    #[must_use]
    pub fn first_match(&self, position: usize) -> Option<f64> {
        self.first.get(position).copied().flatten()
    }

    /// Run time of the spec at `position`, censored against `limit`.
    #[must_use]
    pub fn resolve(&self, position: usize, limit: TimeLimit) -> RunTime {
        self.first_match(position)
            .map_or(RunTime::Timeout, |elapsed| limit.censor(elapsed))
    }

    /// Number of specs that matched some record.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.first.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{first_match, MatchPolicy};

    fn counter_specs(range: std::ops::RangeInclusive<i64>) -> Vec<MatchSpec> {
        range
            .map(|n| MatchSpec::containment("counter_8", format!("core_80/envs_{n}")))
            .collect()
    }

    #[test]
    fn test_index_keeps_first_duplicate() {
        let records = vec![
            RawRecord::new("counter_8", "core_80/envs_81", 12.5),
            RawRecord::new("counter_8", "core_80/envs_81", 1.0),
        ];
        let index = MatchIndex::build(&counter_specs(80..=81), &records);

        assert_eq!(index.len(), 2);
        assert_eq!(index.first_match(0), None);
        assert_eq!(index.first_match(1), Some(12.5));
        assert_eq!(index.matched(), 1);
    }

    #[test]
    fn test_index_out_of_range_is_timeout() {
        let index = MatchIndex::build(&[], &[]);
        let limit = TimeLimit::from_secs(300.0).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.resolve(3, limit), RunTime::Timeout);
    }

    #[test]
    fn test_one_record_can_settle_several_specs() {
        // Containment lets envs_81 satisfy both "envs_8" and "envs_81".
        let specs = vec![
            MatchSpec::containment("rooms_9", "envs_8"),
            MatchSpec::containment("rooms_9", "envs_81"),
        ];
        let records = vec![RawRecord::new("rooms_9", "maps/envs_81", 3.0)];
        let index = MatchIndex::build(&specs, &records);
        assert_eq!(index.first_match(0), Some(3.0));
        assert_eq!(index.first_match(1), Some(3.0));
    }

    // Property-based tests: the index must agree with a linear scan per spec
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_record() -> impl Strategy<Value = RawRecord> {
            (1i64..4, 1i64..13, 0u32..400).prop_map(|(counter, envs, centis)| {
                RawRecord::new(
                    format!("bench/counter_{counter}/goal.ltlf"),
                    format!("bench/core_1/envs_{envs}"),
                    f64::from(centis) / 4.0,
                )
            })
        }

        fn arb_spec() -> impl Strategy<Value = MatchSpec> {
            (1i64..4, 1i64..13, any::<bool>()).prop_map(|(counter, n, suffix)| {
                let policy = if suffix {
                    MatchPolicy::SuffixExact
                } else {
                    MatchPolicy::Containment
                };
                MatchSpec::new(format!("counter_{counter}"), format!("envs_{n}"), policy)
                    .with_anchor("core_1/")
            })
        }

        proptest! {
            /// Property: index lookup == first match of a linear scan
            #[test]
            fn prop_index_equals_linear_scan(
                records in prop::collection::vec(arb_record(), 0..60),
                specs in prop::collection::vec(arb_spec(), 0..20)
            ) {
                let index = MatchIndex::build(&specs, &records);
                for (i, spec) in specs.iter().enumerate() {
                    prop_assert_eq!(index.first_match(i), first_match(spec, &records));
                }
            }
        }
    }
}
