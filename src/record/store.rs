//! Record Store - the ordered timing log of one variant
//!
//! File order is kept exactly: matching resolves duplicates by taking the
//! first row, so reordering records would change results.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use super::RawRecord;
use crate::error::{MalformedReason, MalformedRecordError};
use crate::{Error, Result};

/// Number of fields in a well-formed timing row: tag, path, elapsed.
const FIELDS_PER_ROW: usize = 3;

/// Immutable, ordered timing records of one solver variant.
///
/// ## Design
///
/// Rows that cannot be parsed are excluded and kept as diagnostics instead
/// of failing the load. A missing log, on the other hand, is fatal: an empty
/// store would be indistinguishable from "every run timed out".
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore {
    variant: String,
    records: Vec<RawRecord>,
    rejected: Vec<MalformedRecordError>,
}

impl RecordStore {
    /// Load a variant's timing log from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingSource` if the file cannot be opened, or
    /// `Error::Io` if reading fails part way through.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mtsyft_results::record::RecordStore;
    ///
    /// let store = RecordStore::load("MtSyft", "res_mtsyft.csv")?;
    /// println!("{} runs, {} rejected rows", store.len(), store.rejected().len());
    /// # Ok::<(), mtsyft_results::Error>(())
    /// ```
    pub fn load(variant: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let variant = variant.into();
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| Error::MissingSource {
            variant: variant.clone(),
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_reader(variant, file)?;
        info!(
            variant = %store.variant,
            path = %path.display(),
            records = store.records.len(),
            rejected = store.rejected.len(),
            "loaded timing log"
        );
        Ok(store)
    }

    /// Parse a timing log from any reader (no header row, comma delimited).
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the underlying reader fails. Unparsable rows
    /// are not errors; see [`rejected`](Self::rejected).
    pub fn from_reader<R: Read>(variant: impl Into<String>, reader: R) -> Result<Self> {
        let variant = variant.into();
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut rejected = Vec::new();

        for (index, row) in csv_reader.records().enumerate() {
            let fallback_line = index as u64 + 1;
            let outcome = match row {
                Ok(row) => {
                    let line = row.position().map_or(fallback_line, csv::Position::line);
                    parse_row(&row).map_err(|reason| (line, reason))
                }
                Err(err) if err.is_io_error() => return Err(Error::Io(err.into())),
                Err(err) => {
                    let line = err.position().map_or(fallback_line, csv::Position::line);
                    Err((line, MalformedReason::Unreadable(err.to_string())))
                }
            };

            match outcome {
                Ok(record) => records.push(record),
                Err((line, reason)) => {
                    let malformed = MalformedRecordError {
                        variant: variant.clone(),
                        line,
                        reason,
                    };
                    warn!(%malformed, "excluding timing row");
                    rejected.push(malformed);
                }
            }
        }

        Ok(Self {
            variant,
            records,
            rejected,
        })
    }

    /// Build a store from records already in memory, in the given order.
    #[must_use]
    pub fn from_records(variant: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            variant: variant.into(),
            records,
            rejected: Vec::new(),
        }
    }

    /// Get the variant ID this log belongs to.
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Well-formed records in file order.
    #[must_use]
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Number of well-formed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no well-formed record was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows excluded during loading, in file order.
    #[must_use]
    pub fn rejected(&self) -> &[MalformedRecordError] {
        &self.rejected
    }

    /// Fail on the first rejected row, for strict ingestion.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedRecord` if any row was excluded
    pub fn ensure_clean(&self) -> Result<()> {
        match self.rejected.first() {
            Some(malformed) => Err(Error::MalformedRecord(malformed.clone())),
            None => Ok(()),
        }
    }
}

fn parse_row(row: &StringRecord) -> std::result::Result<RawRecord, MalformedReason> {
    if row.len() != FIELDS_PER_ROW {
        return Err(MalformedReason::FieldCount(row.len()));
    }

    let raw_elapsed = row[2].trim();
    let elapsed: f64 = raw_elapsed
        .parse()
        .map_err(|_| MalformedReason::NotANumber(raw_elapsed.to_string()))?;
    if !elapsed.is_finite() || elapsed < 0.0 {
        return Err(MalformedReason::OutOfRange(raw_elapsed.to_string()));
    }

    Ok(RawRecord::new(&row[0], &row[1], elapsed))
}
