#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use swingwatch::domain::asset::AssetConfig;
use swingwatch::domain::error::SwingwatchError;
use swingwatch::domain::fees::{FeeCalculator, FeeSchedule};
pub use swingwatch::domain::price::PriceSample;
use swingwatch::domain::report::AssetReport;
use swingwatch::domain::signal::{Action, Signal};
use swingwatch::ports::history_port::HistoryPort;
use swingwatch::ports::notify_port::NotifyPort;
use swingwatch::ports::quote_port::QuotePort;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Fixed rates used across the integration suite: maker 0.25%, taker 0.5%,
/// tax 24%.
pub fn fee_calculator() -> FeeCalculator {
    FeeCalculator::new(FeeSchedule {
        maker_fee_pct: 0.25,
        taker_fee_pct: 0.5,
        tax_rate_pct: 24.0,
    })
}

pub fn make_sample(symbol: &str, price: f64, fetched_at: i64) -> PriceSample {
    PriceSample {
        symbol: symbol.into(),
        price,
        volume_24h: 1_000_000.0,
        volume_change_24h: -5.0,
        percent_change_1h: 0.1,
        percent_change_24h: -1.2,
        percent_change_7d: 2.5,
        percent_change_30d: -6.0,
        percent_change_60d: 15.0,
        percent_change_90d: 3.0,
        market_cap: 10_000_000_000.0,
        fetched_at,
    }
}

pub fn make_asset(symbol: &str) -> AssetConfig {
    AssetConfig::new(symbol)
}

pub struct MockQuotePort {
    pub quotes: HashMap<String, PriceSample>,
    pub failures: HashMap<String, String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            quotes: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    pub fn with_quote(mut self, symbol: &str, price: f64) -> Self {
        self.quotes
            .insert(symbol.to_string(), make_sample(symbol, price, 1000));
        self
    }

    pub fn with_failure(mut self, symbol: &str, reason: &str) -> Self {
        self.failures
            .insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl QuotePort for MockQuotePort {
    fn fetch_quote(&self, symbol: &str) -> Result<PriceSample, SwingwatchError> {
        if let Some(reason) = self.failures.get(symbol) {
            return Err(SwingwatchError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| SwingwatchError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: "no quote configured".into(),
            })
    }
}

/// In-memory history store preserving insertion order per symbol.
pub struct MockHistoryPort {
    pub samples: RefCell<HashMap<String, Vec<PriceSample>>>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            samples: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_history(self, symbol: &str, samples: Vec<PriceSample>) -> Self {
        self.samples.borrow_mut().insert(symbol.to_string(), samples);
        self
    }
}

impl HistoryPort for MockHistoryPort {
    fn append_sample(&self, sample: &PriceSample) -> Result<(), SwingwatchError> {
        self.samples
            .borrow_mut()
            .entry(sample.symbol.clone())
            .or_default()
            .push(sample.clone());
        Ok(())
    }

    fn read_history(
        &self,
        symbol: &str,
        since_ms: Option<i64>,
    ) -> Result<Vec<PriceSample>, SwingwatchError> {
        let samples = self.samples.borrow();
        Ok(samples
            .get(symbol)
            .map(|history| {
                history
                    .iter()
                    .filter(|s| since_ms.is_none_or(|since| s.fetched_at >= since))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn prune_older_than(
        &self,
        symbol: &str,
        retention_days: i64,
    ) -> Result<(), SwingwatchError> {
        let cutoff = retention_days * MILLIS_PER_DAY;
        if let Some(history) = self.samples.borrow_mut().get_mut(symbol) {
            history.retain(|s| s.fetched_at >= cutoff);
        }
        Ok(())
    }
}

/// Notifier that records every delivery for later assertions.
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<SentNotification>>,
    pub fail_with: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub action: Action,
    pub rule: String,
    pub symbol: String,
    pub price: f64,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl NotifyPort for RecordingNotifier {
    fn notify(&self, signal: &Signal, report: &AssetReport) -> Result<(), SwingwatchError> {
        self.sent.borrow_mut().push(SentNotification {
            action: signal.action,
            rule: signal.rule.to_string(),
            symbol: report.quote.symbol.clone(),
            price: report.quote.price,
        });

        match &self.fail_with {
            Some(reason) => Err(SwingwatchError::Notify {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}
