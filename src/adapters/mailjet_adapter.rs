//! Mailjet email notifier.
//!
//! Posts one message per fired rule to the Mailjet v3.1 send API. The subject
//! carries the action, symbol and price; the HTML body embeds the full asset
//! report so the email stands alone.

use crate::domain::error::SwingwatchError;
use crate::domain::report::AssetReport;
use crate::domain::signal::Signal;
use crate::ports::notify_port::NotifyPort;
use serde_json::{json, Value};
use std::time::Duration;

const SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

#[derive(Debug, Clone)]
pub struct MailjetConfig {
    pub api_key: String,
    pub secret_key: String,
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub to_name: String,
}

pub struct MailjetAdapter {
    client: reqwest::blocking::Client,
    config: MailjetConfig,
    send_url: String,
}

impl MailjetAdapter {
    pub fn new(config: MailjetConfig) -> Result<Self, SwingwatchError> {
        Self::with_send_url(config, SEND_URL.to_string())
    }

    /// Send-URL override used by tests pointed at a local server.
    pub fn with_send_url(
        config: MailjetConfig,
        send_url: String,
    ) -> Result<Self, SwingwatchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        Ok(Self {
            client,
            config,
            send_url,
        })
    }

    fn build_payload(&self, signal: &Signal, report: &AssetReport) -> Value {
        let symbol = &report.quote.symbol;
        let price = report.quote.price;

        let subject = format!("~~ {} - {} - ${:.2}", symbol, signal.action, price);
        let text_part = format!(
            "Trade Recommendation: {} {} at {:.2} (rule: {}).",
            signal.action, symbol, price, signal.rule
        );
        let report_json =
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
        let html_part = format!(
            "<h3>{} - Price Report</h3>\
             <p><strong>suggestion</strong>: {} ({})</p>\
             <pre>{}</pre>",
            symbol, signal.action, signal.rule, report_json
        );

        json!({
            "Messages": [
                {
                    "From": {
                        "Email": self.config.from_email,
                        "Name": self.config.from_name,
                    },
                    "To": [
                        {
                            "Email": self.config.to_email,
                            "Name": self.config.to_name,
                        }
                    ],
                    "Subject": subject,
                    "TextPart": text_part,
                    "HTMLPart": html_part,
                }
            ]
        })
    }
}

impl NotifyPort for MailjetAdapter {
    fn notify(&self, signal: &Signal, report: &AssetReport) -> Result<(), SwingwatchError> {
        let payload = self.build_payload(signal, report);

        let response = self
            .client
            .post(&self.send_url)
            .basic_auth(&self.config.api_key, Some(&self.config.secret_key))
            .json(&payload)
            .send()
            .map_err(|e| SwingwatchError::Notify {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwingwatchError::Notify {
                reason: format!("HTTP {status}"),
            });
        }
        Ok(())
    }
}
