//! Property-based tests for table construction
//!
//! - Totality: every sweep key appears exactly once, one time per variant
//! - Idempotence: the same inputs always give the same table
//! - Censoring: solved times are always below the limit
//! - Run with ProptestConfig::with_cases(100)

use proptest::prelude::*;

use mtsyft_results::family::presets;
use mtsyft_results::record::{RawRecord, RecordStore};
use mtsyft_results::stats::StatisticsReducer;
use mtsyft_results::table::TableBuilder;
use mtsyft_results::RunTime;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate a robot-navigation style record, sometimes with unrelated tokens
fn arb_record() -> impl Strategy<Value = RawRecord> {
    (0i64..12, 0i64..12, 0.0f64..1500.0, any::<bool>()).prop_map(|(rooms, n, elapsed, noise)| {
        let tag = if noise {
            format!("maze_{rooms}/goal")
        } else {
            format!("rooms_{rooms}/goal")
        };
        RawRecord::new(tag, format!("bench/envs_{n}/env.json"), elapsed)
    })
}

/// Generate a variant store with up to 80 records
fn arb_store(variant: &'static str) -> impl Strategy<Value = RecordStore> {
    proptest::collection::vec(arb_record(), 0..80)
        .prop_map(move |records| RecordStore::from_records(variant, records))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: every key of the sweep gets exactly one row, every row one time per variant
    #[test]
    fn prop_table_is_total(a in arb_store("MtSyft"), b in arb_store("cb-MtSyft")) {
        let family = presets::robot_navigation();
        let table = TableBuilder::new(&family).store(&a).store(&b).build().unwrap();
        let domain = family.domain().unwrap();

        prop_assert_eq!(table.len(), domain.len());
        for (row, key) in table.iter().zip(domain.iter()) {
            prop_assert_eq!(row.key(), key);
            prop_assert_eq!(row.times().count(), 2);
        }
    }

    /// Property: building twice from the same stores gives identical tables
    #[test]
    fn prop_table_is_idempotent(a in arb_store("MtSyft")) {
        let family = presets::robot_navigation();
        let first = TableBuilder::new(&family).store(&a).build().unwrap();
        let second = TableBuilder::new(&family).store(&a).build().unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// Property: solved times are strictly below the limit and come from the log
    #[test]
    fn prop_solved_times_are_censored(a in arb_store("MtSyft")) {
        let family = presets::robot_navigation();
        let limit = family.limit().as_secs();
        let table = TableBuilder::new(&family).store(&a).build().unwrap();

        for time in table.column("MtSyft").unwrap() {
            if let RunTime::Solved(secs) = time {
                prop_assert!(secs < limit);
                prop_assert!(a.records().iter().any(|r| r.elapsed().to_bits() == secs.to_bits()));
            }
        }
    }

    /// Property: per-group instance counts add up to the table size
    #[test]
    fn prop_coverage_partitions_rows(a in arb_store("MtSyft")) {
        let family = presets::robot_navigation();
        let table = TableBuilder::new(&family).store(&a).build().unwrap();
        let report = StatisticsReducer::reduce_by_param(&table, "rooms").unwrap();

        let instances: usize = report.iter().map(|(_, _, stat)| stat.instances).sum();
        let solved: usize = report.iter().map(|(_, _, stat)| stat.solved).sum();
        prop_assert_eq!(instances, table.len());
        prop_assert_eq!(
            solved,
            table.iter().filter(|row| row.solved_by() == 1).count()
        );
    }
}
