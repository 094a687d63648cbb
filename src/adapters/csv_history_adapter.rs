//! CSV price-history adapter.
//!
//! One append-only CSV file per symbol under a base directory
//! (`<SYMBOL>_history.csv`). Pruning rewrites the file with only the samples
//! inside the retention window. Callers serialize access per symbol;
//! overlapping writers for the same symbol are not supported.

use crate::domain::error::SwingwatchError;
use crate::domain::price::PriceSample;
use crate::ports::history_port::HistoryPort;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn history_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}_history.csv", symbol))
    }

    fn store_error(reason: impl ToString) -> SwingwatchError {
        SwingwatchError::History {
            reason: reason.to_string(),
        }
    }
}

impl HistoryPort for CsvHistoryAdapter {
    fn append_sample(&self, sample: &PriceSample) -> Result<(), SwingwatchError> {
        fs::create_dir_all(&self.base_path)?;

        let path = self.history_path(&sample.symbol);
        let write_headers = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_headers)
            .from_writer(file);
        writer.serialize(sample).map_err(Self::store_error)?;
        writer.flush()?;
        Ok(())
    }

    fn read_history(
        &self,
        symbol: &str,
        since_ms: Option<i64>,
    ) -> Result<Vec<PriceSample>, SwingwatchError> {
        let path = self.history_path(symbol);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path).map_err(Self::store_error)?;
        let mut samples = Vec::new();
        for result in reader.deserialize() {
            let sample: PriceSample = result.map_err(Self::store_error)?;
            if since_ms.is_none_or(|since| sample.fetched_at >= since) {
                samples.push(sample);
            }
        }

        samples.sort_by_key(|s| s.fetched_at);
        Ok(samples)
    }

    fn prune_older_than(
        &self,
        symbol: &str,
        retention_days: i64,
    ) -> Result<(), SwingwatchError> {
        let path = self.history_path(symbol);
        if !path.exists() {
            return Ok(());
        }

        let cutoff = Utc::now().timestamp_millis() - retention_days * MILLIS_PER_DAY;
        let kept = self.read_history(symbol, Some(cutoff))?;

        // An empty rewrite would leave a headerless file; drop it instead so
        // the next append starts a fresh log.
        if kept.is_empty() {
            fs::remove_file(&path)?;
            return Ok(());
        }

        let mut writer = csv::Writer::from_path(&path).map_err(Self::store_error)?;
        for sample in &kept {
            writer.serialize(sample).map_err(Self::store_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}
