//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the mean of the first n prices, then iterate
//! EMA[i] = P[i]·k + EMA[i−1]·(1−k) over the remaining samples.

use super::InsufficientData;
use crate::domain::price::PriceSample;

/// EMA over the full history with an SMA seed. Requires at least `period`
/// samples (and a nonzero period).
pub fn calculate_ema(history: &[PriceSample], period: usize) -> Result<f64, InsufficientData> {
    if period == 0 || history.len() < period {
        return Err(InsufficientData {
            have: history.len(),
            need: period.max(1),
        });
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed: f64 = history[..period].iter().map(|s| s.price).sum::<f64>() / period as f64;

    let mut ema = seed;
    for sample in &history[period..] {
        ema = sample.price * k + ema * (1.0 - k);
    }
    Ok(ema)
}
