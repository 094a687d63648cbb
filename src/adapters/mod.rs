//! Concrete adapter implementations for ports.

pub mod coinmarketcap_adapter;
pub mod csv_history_adapter;
pub mod file_config_adapter;
pub mod mailjet_adapter;
pub mod stderr_notifier;
