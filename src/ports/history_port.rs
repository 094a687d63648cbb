//! Price history store port trait.

use crate::domain::error::SwingwatchError;
use crate::domain::price::PriceSample;

pub trait HistoryPort {
    /// Append one sample to the symbol's history log.
    fn append_sample(&self, sample: &PriceSample) -> Result<(), SwingwatchError>;

    /// Samples for `symbol` ordered oldest-first, optionally restricted to
    /// those fetched at or after `since_ms`. A symbol with no history yields
    /// an empty sequence, not an error.
    fn read_history(
        &self,
        symbol: &str,
        since_ms: Option<i64>,
    ) -> Result<Vec<PriceSample>, SwingwatchError>;

    /// Drop samples older than the retention window.
    fn prune_older_than(&self, symbol: &str, retention_days: i64)
        -> Result<(), SwingwatchError>;
}
