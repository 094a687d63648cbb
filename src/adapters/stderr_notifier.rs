//! Stderr notifier for runs without configured email delivery.

use crate::domain::error::SwingwatchError;
use crate::domain::report::AssetReport;
use crate::domain::signal::Signal;
use crate::ports::notify_port::NotifyPort;

pub struct StderrNotifier;

impl NotifyPort for StderrNotifier {
    fn notify(&self, signal: &Signal, report: &AssetReport) -> Result<(), SwingwatchError> {
        eprintln!(
            "ALERT: {} {} at {:.2} (rule: {})",
            signal.action, report.quote.symbol, report.quote.price, signal.rule
        );
        Ok(())
    }
}
