//! Integration test for the Parquet export
//!
//! Tests the presenter handoff:
//! 1. Build a comparison table and its coverage report
//! 2. Project both into Arrow batches
//! 3. Write them to Parquet and read them back

use arrow::array::{Array, Float64Array, Int64Array, StringArray, UInt32Array};
use mtsyft_results::family::presets;
use mtsyft_results::record::{RawRecord, RecordStore};
use mtsyft_results::stats::StatisticsReducer;
use mtsyft_results::storage::{ResultStorage, SOLVED_BY_COLUMN};
use mtsyft_results::table::{ComparisonTable, TableBuilder};

fn robot_table() -> ComparisonTable {
    let family = presets::robot_navigation();
    let base = RecordStore::from_records(
        "MtSyft",
        vec![
            RawRecord::new("rooms_2", "envs_1", 10.0),
            RawRecord::new("rooms_2", "envs_2", 990.0),
        ],
    );
    let chained = RecordStore::from_records(
        "cb-MtSyft",
        vec![RawRecord::new("rooms_2", "envs_2", 2000.0)],
    );
    TableBuilder::new(&family)
        .store(&base)
        .store(&chained)
        .build()
        .unwrap()
}

#[test]
fn test_table_parquet_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table2.parquet");

    let table = robot_table();
    let batch = table.to_record_batch().unwrap();
    ResultStorage::from_batch(batch.clone()).write_parquet(&path).unwrap();

    let loaded = ResultStorage::load_parquet(&path).unwrap();
    assert_eq!(loaded.num_rows(), 54);
    let reloaded = &loaded.batches()[0];
    assert_eq!(reloaded.schema().fields(), batch.schema().fields());

    let rooms = reloaded.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
    let n = reloaded.column(1).as_any().downcast_ref::<Int64Array>().unwrap();
    let base = reloaded.column(2).as_any().downcast_ref::<Float64Array>().unwrap();
    let chained = reloaded.column(3).as_any().downcast_ref::<Float64Array>().unwrap();
    let solved_by = reloaded
        .column_by_name(SOLVED_BY_COLUMN)
        .unwrap()
        .as_any()
        .downcast_ref::<UInt32Array>()
        .unwrap();

    // first rows are rooms=2, n=1 and rooms=2, n=2
    assert_eq!((rooms.value(0), n.value(0)), (2, 1));
    assert_eq!((rooms.value(1), n.value(1)), (2, 2));
    assert!((base.value(0) - 10.0).abs() < f64::EPSILON);
    assert!((base.value(1) - 990.0).abs() < f64::EPSILON);
    // 2000 s is over the limit, rendered as the limit itself
    assert!((chained.value(1) - 1000.0).abs() < f64::EPSILON);
    assert_eq!(solved_by.value(0), 1);
    assert_eq!(solved_by.value(53), 0);
}

#[test]
fn test_coverage_parquet_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coverage.parquet");

    let report = StatisticsReducer::reduce_by_param(&robot_table(), "rooms").unwrap();
    ResultStorage::from_batch(report.to_record_batch().unwrap())
        .write_parquet(&path)
        .unwrap();

    let loaded = ResultStorage::load_parquet(&path).unwrap();
    // rooms 2..=10, two variants each
    assert_eq!(loaded.num_rows(), 18);

    let batch = &loaded.batches()[0];
    let variant = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
    let avg = batch.column(4).as_any().downcast_ref::<Float64Array>().unwrap();
    assert_eq!(variant.value(0), "MtSyft");
    assert!((avg.value(0) - 500.0).abs() < f64::EPSILON);
    assert_eq!(avg.null_count(), 0);
}

#[test]
fn test_append_keeps_one_schema() {
    let table = robot_table();
    let mut storage = ResultStorage::from_batch(table.to_record_batch().unwrap());
    storage.append_batch(table.to_record_batch().unwrap()).unwrap();
    assert_eq!(storage.num_rows(), 108);

    let report = StatisticsReducer::reduce_by_param(&table, "rooms").unwrap();
    assert!(storage
        .append_batch(report.to_record_batch().unwrap())
        .is_err());
}
