//! Price source port trait.

use crate::domain::error::SwingwatchError;
use crate::domain::price::PriceSample;

pub trait QuotePort {
    /// Latest market snapshot for `symbol`. An error means the sample is
    /// unavailable this cycle; callers skip the symbol rather than abort the
    /// batch.
    fn fetch_quote(&self, symbol: &str) -> Result<PriceSample, SwingwatchError>;
}
