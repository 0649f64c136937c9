//! Storage backend (Arrow/Parquet)
//!
//! Comparison tables and coverage reports are exported as Arrow record
//! batches and persisted as Parquet, so downstream plotting and notebooks can
//! read them without re-running the matcher.
//!
//! **Append-only**: a `ResultStorage` only grows by whole batches, and every
//! batch must share the schema of the first one.

mod batch;

pub use batch::SOLVED_BY_COLUMN;

use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use tracing::info;

use crate::{Error, Result};

/// In-memory collection of same-schema Arrow batches.
#[derive(Debug, Clone, Default)]
pub struct ResultStorage {
    batches: Vec<RecordBatch>,
}

impl ResultStorage {
    /// Create storage from existing batches
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the batches do not share one schema
    pub fn new(batches: Vec<RecordBatch>) -> Result<Self> {
        let mut storage = Self::default();
        for batch in batches {
            storage.append_batch(batch)?;
        }
        Ok(storage)
    }

    /// Create storage holding a single batch.
    #[must_use]
    pub fn from_batch(batch: RecordBatch) -> Self {
        Self {
            batches: vec![batch],
        }
    }

    /// Load batches from a Parquet file
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the file cannot be opened or decoded
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::Storage(format!("Failed to open Parquet file {}: {e}", path.display()))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::Storage(format!("Failed to parse Parquet file: {e}")))?;

        let reader = builder
            .build()
            .map_err(|e| Error::Storage(format!("Failed to create Parquet reader: {e}")))?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch =
                batch.map_err(|e| Error::Storage(format!("Failed to read record batch: {e}")))?;
            batches.push(batch);
        }

        Ok(Self { batches })
    }

    /// Write every batch to a single Parquet file, replacing it if present.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if there is nothing to write or the file
    /// cannot be written
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mtsyft_results::family::presets;
    /// use mtsyft_results::record::RecordStore;
    /// use mtsyft_results::storage::ResultStorage;
    /// use mtsyft_results::table::TableBuilder;
    ///
    /// let family = presets::robot_navigation();
    /// let store = RecordStore::load("MtSyft", "res_mtsyft.csv")?;
    /// let table = TableBuilder::new(&family).store(&store).build()?;
    ///
    /// ResultStorage::from_batch(table.to_record_batch()?).write_parquet("table2.parquet")?;
    /// # Ok::<(), mtsyft_results::Error>(())
    /// ```
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let schema = self
            .batches
            .first()
            .map(RecordBatch::schema)
            .ok_or_else(|| Error::Storage("no record batches to write".to_string()))?;

        let file = File::create(path).map_err(|e| {
            Error::Storage(format!("Failed to create Parquet file {}: {e}", path.display()))
        })?;
        let mut writer = ArrowWriter::try_new(file, schema, None)
            .map_err(|e| Error::Storage(format!("Failed to create Parquet writer: {e}")))?;

        for batch in &self.batches {
            writer
                .write(batch)
                .map_err(|e| Error::Storage(format!("Failed to write record batch: {e}")))?;
        }
        writer
            .close()
            .map_err(|e| Error::Storage(format!("Failed to finish Parquet file: {e}")))?;

        info!(
            path = %path.display(),
            batches = self.batches.len(),
            rows = self.num_rows(),
            "wrote parquet"
        );
        Ok(())
    }

    /// Get all record batches
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total rows across batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Append a batch
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the batch schema doesn't match existing
    /// batches
    pub fn append_batch(&mut self, batch: RecordBatch) -> Result<()> {
        if let Some(first) = self.batches.first() {
            let existing_schema = first.schema();
            if batch.schema() != existing_schema {
                return Err(Error::Storage(format!(
                    "Schema mismatch: expected {:?}, got {:?}",
                    existing_schema,
                    batch.schema()
                )));
            }
        }

        self.batches.push(batch);
        Ok(())
    }
}
