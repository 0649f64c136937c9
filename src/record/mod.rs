//! Timing log ingestion
//!
//! Every solver variant appends one row per finished run to its own log:
//!
//! ```text
//! res_mtsyft.csv       ──> RecordStore("MtSyft")
//! res_cb_mtsyft.csv    ──> RecordStore("cb-MtSyft")
//! res_conj_mtsyft.csv  ──> RecordStore("conj-MtSyft")
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mtsyft_results::record::RecordStore;
//!
//! let log = "counter_8/goal.ltlf,core_80/envs_81,12.5\nbroken row\n";
//! let store = RecordStore::from_reader("MtSyft", log.as_bytes())?;
//!
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.rejected().len(), 1);
//! # Ok::<(), mtsyft_results::Error>(())
//! ```

mod raw_record;
mod store;

pub use raw_record::RawRecord;
pub use store::RecordStore;
