//! Arrow projections of comparison tables and coverage reports

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::stats::CoverageReport;
use crate::table::ComparisonTable;
use crate::{Error, Result};

/// Column counting how many variants solved each row.
pub const SOLVED_BY_COLUMN: &str = "solved_by";

impl ComparisonTable {
    /// Project the table into an Arrow batch.
    ///
    /// Columns: one `Int64` per key parameter (named after the parameter),
    /// one `Float64` per variant (timeouts rendered as the time limit), and
    /// `solved_by` (`UInt32`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if rows do not share the same parameters, or
    /// `Error::Arrow` if the batch cannot be assembled
    ///
    /// # Example
    ///
    /// ```rust
    /// use mtsyft_results::family::presets;
    /// use mtsyft_results::record::RecordStore;
    /// use mtsyft_results::table::TableBuilder;
    ///
    /// let family = presets::robot_navigation();
    /// let store = RecordStore::from_records("MtSyft", Vec::new());
    /// let table = TableBuilder::new(&family).store(&store).build()?;
    ///
    /// let batch = table.to_record_batch()?;
    /// assert_eq!(batch.num_rows(), 54);
    /// assert_eq!(batch.schema().field(2).name(), "MtSyft");
    /// # Ok::<(), mtsyft_results::Error>(())
    /// ```
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let params: Vec<String> = self
            .rows()
            .first()
            .map(|row| row.key().params().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default();

        let mut fields = Vec::with_capacity(params.len() + self.variants().len() + 1);
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());

        for name in &params {
            let values = self
                .iter()
                .map(|row| {
                    row.key().get(name).ok_or_else(|| {
                        Error::Storage(format!("instance {} has no parameter {name}", row.key()))
                    })
                })
                .collect::<Result<Vec<i64>>>()?;
            fields.push(Field::new(name, DataType::Int64, false));
            columns.push(Arc::new(Int64Array::from(values)));
        }

        let limit = self.limit();
        for variant in self.variants() {
            let values: Vec<f64> = self
                .column(variant)
                .unwrap_or_default()
                .into_iter()
                .map(|time| time.secs_or_limit(limit))
                .collect();
            fields.push(Field::new(variant, DataType::Float64, false));
            columns.push(Arc::new(Float64Array::from(values)));
        }

        let solved_by = self
            .iter()
            .map(|row| u32::try_from(row.solved_by()).unwrap_or(u32::MAX));
        fields.push(Field::new(SOLVED_BY_COLUMN, DataType::UInt32, false));
        columns.push(Arc::new(UInt32Array::from_iter_values(solved_by)));

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }
}

impl CoverageReport<i64> {
    /// Project the report into an Arrow batch.
    ///
    /// Columns: `group` (`Int64`), `variant` (`Utf8`), `solved` and
    /// `instances` (`UInt64`), `avg_runtime` (`Float64`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Arrow` if the batch cannot be assembled
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Schema::new(vec![
            Field::new("group", DataType::Int64, false),
            Field::new("variant", DataType::Utf8, false),
            Field::new("solved", DataType::UInt64, false),
            Field::new("instances", DataType::UInt64, false),
            Field::new("avg_runtime", DataType::Float64, false),
        ]);

        let groups = Int64Array::from_iter_values(self.iter().map(|(group, _, _)| *group));
        let variants = StringArray::from_iter_values(
            self.iter()
                .map(|(_, variant, _)| variant)
                .collect::<Vec<_>>(),
        );
        let solved =
            UInt64Array::from_iter_values(self.iter().map(|(_, _, stat)| stat.solved as u64));
        let instances =
            UInt64Array::from_iter_values(self.iter().map(|(_, _, stat)| stat.instances as u64));
        let averages =
            Float64Array::from_iter_values(self.iter().map(|(_, _, stat)| stat.avg_runtime));

        Ok(RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(groups),
                Arc::new(variants),
                Arc::new(solved),
                Arc::new(instances),
                Arc::new(averages),
            ],
        )?)
    }
}
