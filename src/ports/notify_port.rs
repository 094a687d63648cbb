//! Notification delivery port trait.

use crate::domain::error::SwingwatchError;
use crate::domain::report::AssetReport;
use crate::domain::signal::Signal;

pub trait NotifyPort {
    /// Deliver one recommendation. Called at most once per fired rule per
    /// evaluation cycle; a delivery failure is logged by the caller and does
    /// not affect the cycle outcome.
    fn notify(&self, signal: &Signal, report: &AssetReport) -> Result<(), SwingwatchError>;
}
