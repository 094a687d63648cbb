//! Technical indicators over a price-history window.
//!
//! All three indicators take the ordered (oldest-first) sample sequence read
//! from the history store and report [`InsufficientData`] instead of a
//! misleading value when the window is too short.

pub mod ema;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use rsi::{calculate_rsi, Rsi, RsiRegime};
pub use sma::calculate_sma;

/// Default lookback shared by all indicators: 14 samples (SMA/EMA) or a
/// 14-day trailing window (RSI).
pub const DEFAULT_PERIOD: usize = 14;

/// History window too short to compute an indicator. The report simply omits
/// the indicator; evaluation continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("insufficient history: have {have} samples, need {need}")]
pub struct InsufficientData {
    pub have: usize,
    pub need: usize,
}
