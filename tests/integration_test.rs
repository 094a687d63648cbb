//! Integration tests for the evaluation pipeline and the history store.
//!
//! Tests cover:
//! - Full fetch → evaluate → notify pipeline with mock ports
//! - Signal priority through the pipeline (resistance over limit tiers)
//! - Alert riding alongside a trade signal (two deliveries, one cycle)
//! - Unavailable quotes skipping one symbol without aborting the batch
//! - Notification failure leaving the cycle outcome untouched
//! - History round-trip and pruning through the real CSV adapter

mod common;

use common::*;
use swingwatch::adapters::csv_history_adapter::CsvHistoryAdapter;
use swingwatch::cli::{evaluate_asset, run_cycle};
use swingwatch::domain::asset::ScenarioConfig;
use swingwatch::domain::signal::Action;
use swingwatch::ports::history_port::HistoryPort;
use tempfile::TempDir;

mod pipeline {
    use super::*;

    #[test]
    fn sell_at_resistance_notifies_once() {
        let mut asset = make_asset("AVAX");
        asset.entry = 25.0;
        asset.shares = 10.0;
        asset.resistance = Some(29.0);
        asset.sell_limit_1 = Some(28.0);

        let quotes = MockQuotePort::new().with_quote("AVAX", 29.5);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        let (report, decision) =
            evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        assert_eq!(decision.trade.unwrap().action, Action::Sell);
        assert_eq!(notifier.sent_count(), 1);

        let sent = notifier.sent.borrow();
        assert_eq!(sent[0].rule, "resistance");
        assert_eq!(sent[0].symbol, "AVAX");
        assert!((sent[0].price - 29.5).abs() < f64::EPSILON);

        // The report carries full position economics for the email body.
        let position = report.position.unwrap();
        assert!((position.sell_now.gross_profit - 45.0).abs() < 1e-9);
        assert_eq!(position.sell_at_limit.len(), 1);
    }

    #[test]
    fn buy_at_limit_tier_when_support_not_reached() {
        let mut asset = make_asset("DOT");
        asset.support = Some(4.0);
        asset.buy_limit_1 = Some(4.4);

        let quotes = MockQuotePort::new().with_quote("DOT", 4.2);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        let (report, decision) =
            evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        assert_eq!(decision.trade.unwrap().action, Action::Buy);
        assert_eq!(notifier.sent.borrow()[0].rule, "buy_limit_1");
        // No position, no scenario: both reports absent by design.
        assert!(report.position.is_none());
        assert!(report.scenario.is_none());
    }

    #[test]
    fn no_thresholds_sends_nothing() {
        let asset = make_asset("UNI");
        let quotes = MockQuotePort::new().with_quote("UNI", 7.5);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        let (_, decision) =
            evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        assert!(decision.is_none());
        assert_eq!(notifier.sent_count(), 0);
    }

    #[test]
    fn alert_rides_alongside_sell() {
        let mut asset = make_asset("AVAX");
        asset.entry = 25.0;
        asset.shares = 10.0;
        asset.sell_limit_1 = Some(28.0);
        asset.alert_level = Some(29.0);

        let quotes = MockQuotePort::new().with_quote("AVAX", 29.5);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].action, Action::Sell);
        assert_eq!(sent[0].rule, "sell_limit_1");
        assert_eq!(sent[1].action, Action::Alert);
        assert_eq!(sent[1].rule, "alert_level");
    }

    #[test]
    fn evaluation_appends_quote_to_history() {
        let asset = make_asset("ADA");
        let quotes = MockQuotePort::new().with_quote("ADA", 0.42);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        let stored = history.read_history("ADA", None).unwrap();
        assert_eq!(stored.len(), 1);
        assert!((stored[0].price - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn indicators_appear_once_history_is_long_enough() {
        let mut samples = Vec::new();
        for day in 0..20 {
            samples.push(make_sample("ADA", 0.40 + day as f64 * 0.001, day * MILLIS_PER_DAY));
        }

        let asset = make_asset("ADA");
        let quotes = MockQuotePort::new().with_quote("ADA", 0.42);
        let history = MockHistoryPort::new().with_history("ADA", samples);
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        let (report, _) =
            evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        assert!(report.indicators.rsi.is_some());
        assert!(report.indicators.sma.is_some());
        assert!(report.indicators.ema.is_some());
    }

    #[test]
    fn scenario_report_flows_through_pipeline() {
        let mut asset = make_asset("AVAX");
        asset.scenario = Some(ScenarioConfig {
            entry: 27.0,
            shares: 10.0,
            sell_limit: Some(29.0),
        });

        let quotes = MockQuotePort::new().with_quote("AVAX", 28.0);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        let (report, _) =
            evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        let scenario = report.scenario.unwrap();
        assert!((scenario.entry_price - 27.0).abs() < f64::EPSILON);
        assert_eq!(scenario.sell_at_limit.len(), 1);
    }
}

mod batch_isolation {
    use super::*;

    #[test]
    fn failed_fetch_skips_only_that_symbol() {
        let mut avax = make_asset("AVAX");
        avax.entry = 25.0;
        avax.shares = 10.0;
        avax.sell_limit_1 = Some(28.0);
        let dot = make_asset("DOT");
        let ada = make_asset("ADA");

        let quotes = MockQuotePort::new()
            .with_quote("AVAX", 29.0)
            .with_failure("DOT", "HTTP 503")
            .with_quote("ADA", 0.42);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        let evaluated = run_cycle(
            &[avax, dot, ada],
            &quotes,
            &history,
            &notifier,
            &calc,
            false,
        );

        assert_eq!(evaluated, 2);
        // The AVAX signal still went out despite DOT failing.
        assert_eq!(notifier.sent_count(), 1);
        assert_eq!(notifier.sent.borrow()[0].symbol, "AVAX");
        // ADA was evaluated after the failure.
        assert_eq!(history.read_history("ADA", None).unwrap().len(), 1);
        assert!(history.read_history("DOT", None).unwrap().is_empty());
    }

    #[test]
    fn notification_failure_does_not_fail_the_cycle() {
        let mut asset = make_asset("AVAX");
        asset.entry = 25.0;
        asset.shares = 10.0;
        asset.sell_limit_1 = Some(28.0);

        let quotes = MockQuotePort::new().with_quote("AVAX", 29.0);
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::failing("SMTP down");
        let calc = fee_calculator();

        let evaluated = run_cycle(
            std::slice::from_ref(&asset),
            &quotes,
            &history,
            &notifier,
            &calc,
            false,
        );

        assert_eq!(evaluated, 1);
        assert_eq!(notifier.sent_count(), 1);
    }

    #[test]
    fn all_fetches_failing_evaluates_nothing() {
        let quotes = MockQuotePort::new()
            .with_failure("AVAX", "timeout")
            .with_failure("DOT", "timeout");
        let history = MockHistoryPort::new();
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        let evaluated = run_cycle(
            &[make_asset("AVAX"), make_asset("DOT")],
            &quotes,
            &history,
            &notifier,
            &calc,
            false,
        );

        assert_eq!(evaluated, 0);
        assert_eq!(notifier.sent_count(), 0);
    }
}

mod history_store {
    use super::*;

    #[test]
    fn round_trip_preserves_order_and_values() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvHistoryAdapter::new(dir.path().to_path_buf());

        let samples: Vec<PriceSample> = (0..5)
            .map(|i| make_sample("AVAX", 26.0 + i as f64, 1000 + i))
            .collect();
        for sample in &samples {
            adapter.append_sample(sample).unwrap();
        }

        let read = adapter.read_history("AVAX", None).unwrap();
        assert_eq!(read, samples);
    }

    #[test]
    fn read_since_start_returns_everything() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvHistoryAdapter::new(dir.path().to_path_buf());

        for i in 0..3 {
            adapter.append_sample(&make_sample("DOT", 4.0, 1000 + i)).unwrap();
        }

        let read = adapter.read_history("DOT", Some(1000)).unwrap();
        assert_eq!(read.len(), 3);
    }

    #[test]
    fn pipeline_against_real_csv_store() {
        let dir = TempDir::new().unwrap();
        let history = CsvHistoryAdapter::new(dir.path().to_path_buf());

        let asset = make_asset("ADA");
        let quotes = MockQuotePort::new().with_quote("ADA", 0.42);
        let notifier = RecordingNotifier::new();
        let calc = fee_calculator();

        evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();
        evaluate_asset(&asset, &quotes, &history, &notifier, &calc).unwrap();

        let stored = history.read_history("ADA", None).unwrap();
        assert_eq!(stored.len(), 2);
    }
}
