//! Simple Moving Average over the most recent samples.

use super::InsufficientData;
use crate::domain::price::PriceSample;

/// Arithmetic mean of the last `period` prices. Requires at least `period`
/// samples (and a nonzero period).
pub fn calculate_sma(history: &[PriceSample], period: usize) -> Result<f64, InsufficientData> {
    if period == 0 || history.len() < period {
        return Err(InsufficientData {
            have: history.len(),
            need: period.max(1),
        });
    }

    let sum: f64 = history[history.len() - period..]
        .iter()
        .map(|s| s.price)
        .sum();
    Ok(sum / period as f64)
}
