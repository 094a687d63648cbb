//! RSI (Relative Strength Index) over a trailing time window.
//!
//! Wilder's simplified (non-smoothed) form: average gain and average loss are
//! plain means of the price deltas inside the window, so only their ratio
//! matters. RSI = 100 − 100/(1 + avg_gain / avg_loss).
//! If the window has no losses: RSI = 100.
//!
//! The window is anchored at the newest sample's timestamp, not wall-clock
//! time, so the result is a pure function of its input.

use super::InsufficientData;
use crate::domain::price::PriceSample;
use serde::Serialize;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Momentum regime implied by the RSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiRegime {
    Overbought,
    Oversold,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rsi {
    pub value: f64,
    pub regime: RsiRegime,
}

impl RsiRegime {
    fn from_value(value: f64) -> RsiRegime {
        if value > 70.0 {
            RsiRegime::Overbought
        } else if value < 30.0 {
            RsiRegime::Oversold
        } else {
            RsiRegime::Neutral
        }
    }
}

/// RSI over the samples inside the trailing `window_days` window. Requires at
/// least two samples in the window (one delta).
pub fn calculate_rsi(
    history: &[PriceSample],
    window_days: i64,
) -> Result<Rsi, InsufficientData> {
    let newest = history.last().ok_or(InsufficientData { have: 0, need: 2 })?;
    let cutoff = newest.fetched_at - window_days * MILLIS_PER_DAY;

    let window: Vec<&PriceSample> = history
        .iter()
        .filter(|s| s.fetched_at >= cutoff)
        .collect();
    if window.len() < 2 {
        return Err(InsufficientData {
            have: window.len(),
            need: 2,
        });
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let change = pair[1].price - pair[0].price;
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }

    let deltas = (window.len() - 1) as f64;
    let avg_gain = gain_sum / deltas;
    let avg_loss = loss_sum / deltas;

    let value = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    Ok(Rsi {
        value,
        regime: RsiRegime::from_value(value),
    })
}
