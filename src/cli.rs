//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use cron::Schedule;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::coinmarketcap_adapter::CoinMarketCapAdapter;
use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::mailjet_adapter::{MailjetAdapter, MailjetConfig};
use crate::adapters::stderr_notifier::StderrNotifier;
use crate::domain::asset::{AssetConfig, ScenarioConfig};
use crate::domain::error::SwingwatchError;
use crate::domain::fees::{FeeCalculator, FeeSchedule};
use crate::domain::report::{asset_report, AssetReport};
use crate::domain::signal::{self, Decision};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::quote_port::QuotePort;

#[derive(Parser, Debug)]
#[command(
    name = "swingwatch",
    about = "Crypto watchlist monitor and trade-signal notifier"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one evaluation cycle
    Check {
        #[arg(short, long)]
        config: PathBuf,
        /// Evaluate a single symbol instead of the whole watchlist
        symbol: Option<String>,
    },
    /// Evaluate on the configured schedule until interrupted
    Watch {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show history coverage for watched symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Check { config, symbol } => run_check(&config, symbol.as_deref()),
        Command::Watch { config } => run_watch(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SwingwatchError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Split a comma-separated symbol list, uppercased and trimmed.
pub fn parse_symbols(symbols: &str) -> Vec<String> {
    symbols
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn build_fee_schedule(config: &dyn ConfigPort) -> Result<FeeSchedule, SwingwatchError> {
    let require = |key: &str| -> Result<f64, SwingwatchError> {
        config
            .get_string("fees", key)
            .ok_or_else(|| SwingwatchError::ConfigMissing {
                section: "fees".into(),
                key: key.into(),
            })?
            .parse()
            .map_err(|_| SwingwatchError::ConfigInvalid {
                section: "fees".into(),
                key: key.into(),
                reason: "not a number".into(),
            })
    };

    Ok(FeeSchedule {
        maker_fee_pct: require("spot_maker_pct")?,
        taker_fee_pct: require("spot_taker_pct")?,
        tax_rate_pct: require("federal_tax_pct")?,
    })
}

/// Optional price level: absent and zero both load as `None`.
fn threshold(config: &dyn ConfigPort, section: &str, key: &str) -> Option<f64> {
    let value = config.get_double(section, key, 0.0);
    if value > 0.0 { Some(value) } else { None }
}

pub fn build_asset_configs(
    config: &dyn ConfigPort,
) -> Result<Vec<AssetConfig>, SwingwatchError> {
    let symbols_str = config.get_string("watchlist", "symbols").ok_or_else(|| {
        SwingwatchError::ConfigMissing {
            section: "watchlist".into(),
            key: "symbols".into(),
        }
    })?;

    let mut assets = Vec::new();
    for symbol in parse_symbols(&symbols_str) {
        // configparser lowercases section names on load.
        let section = symbol.to_lowercase();

        let entry = config.get_double(&section, "entry", 0.0);
        let shares = config.get_double(&section, "shares", 0.0);
        if shares < 0.0 {
            return Err(SwingwatchError::ConfigInvalid {
                section: section.clone(),
                key: "shares".into(),
                reason: "must not be negative".into(),
            });
        }
        if shares > 0.0 && entry <= 0.0 {
            return Err(SwingwatchError::ConfigInvalid {
                section: section.clone(),
                key: "entry".into(),
                reason: "a held position needs a cost basis".into(),
            });
        }

        let scenario_entry = config.get_double(&section, "scenario_entry", 0.0);
        let scenario_shares = config.get_double(&section, "scenario_shares", 0.0);
        let scenario = if scenario_entry > 0.0 && scenario_shares > 0.0 {
            Some(ScenarioConfig {
                entry: scenario_entry,
                shares: scenario_shares,
                sell_limit: threshold(config, &section, "scenario_sell_limit"),
            })
        } else {
            None
        };

        assets.push(AssetConfig {
            symbol,
            support: threshold(config, &section, "support"),
            resistance: threshold(config, &section, "resistance"),
            buy_limit_1: threshold(config, &section, "buy_limit_1"),
            buy_limit_2: threshold(config, &section, "buy_limit_2"),
            buy_limit_3: threshold(config, &section, "buy_limit_3"),
            sell_limit_1: threshold(config, &section, "sell_limit_1"),
            sell_limit_2: threshold(config, &section, "sell_limit_2"),
            sell_limit_3: threshold(config, &section, "sell_limit_3"),
            entry,
            shares,
            alert_level: threshold(config, &section, "alert_level"),
            enabled: config.get_bool(&section, "enabled", true),
            scenario,
        });
    }

    Ok(assets)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchSettings {
    pub interval_minutes: i64,
    pub retention_days: i64,
}

pub fn build_watch_settings(config: &dyn ConfigPort) -> Result<WatchSettings, SwingwatchError> {
    let interval_minutes = config.get_int("watch", "interval_minutes", 180);
    if interval_minutes <= 0 {
        return Err(SwingwatchError::ConfigInvalid {
            section: "watch".into(),
            key: "interval_minutes".into(),
            reason: "must be positive".into(),
        });
    }

    let retention_days = config.get_int("watch", "retention_days", 30);
    if retention_days <= 0 {
        return Err(SwingwatchError::ConfigInvalid {
            section: "watch".into(),
            key: "retention_days".into(),
            reason: "must be positive".into(),
        });
    }

    Ok(WatchSettings {
        interval_minutes,
        retention_days,
    })
}

/// Convert the poll interval to a cron schedule.
/// Cron format: second minute hour day month weekday.
pub fn build_schedule(interval_minutes: i64) -> Result<Schedule, SwingwatchError> {
    let invalid = |reason: &str| SwingwatchError::ConfigInvalid {
        section: "watch".into(),
        key: "interval_minutes".into(),
        reason: reason.into(),
    };

    if interval_minutes <= 0 {
        return Err(invalid("must be positive"));
    }

    let cron_expr = if interval_minutes < 60 {
        format!("0 */{} * * * *", interval_minutes)
    } else if interval_minutes % 60 == 0 {
        format!("0 0 */{} * * *", interval_minutes / 60)
    } else {
        return Err(invalid("must be under an hour or a whole number of hours"));
    };

    Schedule::from_str(&cron_expr)
        .map_err(|e| invalid(&format!("bad cron expression '{}': {}", cron_expr, e)))
}

fn resolve_api_key(config: &dyn ConfigPort) -> Result<String, SwingwatchError> {
    if let Some(key) = config.get_string("coinmarketcap", "api_key") {
        return Ok(key);
    }
    std::env::var("COINMARKETCAP_API_KEY").map_err(|_| SwingwatchError::ConfigMissing {
        section: "coinmarketcap".into(),
        key: "api_key".into(),
    })
}

fn build_quote_port(config: &dyn ConfigPort) -> Result<CoinMarketCapAdapter, SwingwatchError> {
    CoinMarketCapAdapter::new(resolve_api_key(config)?)
}

fn build_history_adapter(config: &dyn ConfigPort) -> CsvHistoryAdapter {
    let data_dir = config
        .get_string("history", "data_dir")
        .unwrap_or_else(|| "data".to_string());
    CsvHistoryAdapter::new(PathBuf::from(data_dir))
}

fn build_notifier(config: &dyn ConfigPort) -> Result<Box<dyn NotifyPort>, SwingwatchError> {
    let require = |key: &str| -> Result<String, SwingwatchError> {
        config
            .get_string("mailjet", key)
            .ok_or_else(|| SwingwatchError::ConfigMissing {
                section: "mailjet".into(),
                key: key.into(),
            })
    };

    match (
        config.get_string("mailjet", "api_key"),
        config.get_string("mailjet", "secret_key"),
    ) {
        (Some(api_key), Some(secret_key)) => {
            let mailjet = MailjetConfig {
                api_key,
                secret_key,
                from_email: require("from_email")?,
                from_name: config
                    .get_string("mailjet", "from_name")
                    .unwrap_or_else(|| "swingwatch".to_string()),
                to_email: require("to_email")?,
                to_name: config.get_string("mailjet", "to_name").unwrap_or_default(),
            };
            Ok(Box::new(MailjetAdapter::new(mailjet)?))
        }
        _ => {
            eprintln!("Mailjet not configured; alerts will print to stderr");
            Ok(Box::new(StderrNotifier))
        }
    }
}

/// One asset's fetch → evaluate → notify pipeline.
///
/// A fetch failure propagates so the caller can skip the symbol; history and
/// notification failures only warn, since neither changes the evaluation.
pub fn evaluate_asset(
    asset: &AssetConfig,
    quotes: &dyn QuotePort,
    history: &dyn HistoryPort,
    notifier: &dyn NotifyPort,
    calc: &FeeCalculator,
) -> Result<(AssetReport, Decision), SwingwatchError> {
    let quote = quotes.fetch_quote(&asset.symbol)?;

    if let Err(e) = history.append_sample(&quote) {
        eprintln!("warning: failed to record {} sample: {}", asset.symbol, e);
    }
    let samples = match history.read_history(&asset.symbol, None) {
        Ok(samples) => samples,
        Err(e) => {
            eprintln!("warning: failed to read {} history: {}", asset.symbol, e);
            Vec::new()
        }
    };

    let report = asset_report(asset, quote, &samples, calc);
    let decision = signal::evaluate(asset, report.quote.price);

    for fired in decision.signals() {
        if let Err(e) = notifier.notify(fired, &report) {
            eprintln!("warning: notification for {} failed: {}", asset.symbol, e);
        }
    }

    Ok((report, decision))
}

/// Evaluate every asset once. Returns the number of assets evaluated; a
/// failed fetch skips that symbol and never aborts the rest of the batch.
pub fn run_cycle(
    assets: &[AssetConfig],
    quotes: &dyn QuotePort,
    history: &dyn HistoryPort,
    notifier: &dyn NotifyPort,
    calc: &FeeCalculator,
    print_reports: bool,
) -> usize {
    let mut evaluated = 0;

    for asset in assets {
        match evaluate_asset(asset, quotes, history, notifier, calc) {
            Ok((report, decision)) => {
                evaluated += 1;

                if print_reports {
                    match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{json}"),
                        Err(e) => eprintln!("warning: could not render {} report: {}", asset.symbol, e),
                    }
                }

                match decision.trade {
                    Some(fired) => eprintln!(
                        "  {}: {} ({}) at {:.2}",
                        asset.symbol, fired.action, fired.rule, report.quote.price
                    ),
                    None => eprintln!(
                        "  {}: no signal at {:.2}",
                        asset.symbol, report.quote.price
                    ),
                }
                if let Some(alert) = decision.alert {
                    eprintln!("  {}: {} ({})", asset.symbol, alert.action, alert.rule);
                }
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", asset.symbol, e);
            }
        }
    }

    evaluated
}

/// Resolve which assets to evaluate: the whole enabled watchlist, or the one
/// matching the positional symbol argument.
fn select_assets(assets: Vec<AssetConfig>, symbol: Option<&str>) -> Vec<AssetConfig> {
    match symbol {
        Some(wanted) => {
            let wanted = wanted.to_uppercase();
            assets
                .into_iter()
                .filter(|a| a.symbol == wanted && a.enabled)
                .collect()
        }
        None => assets.into_iter().filter(|a| a.enabled).collect(),
    }
}

fn run_check(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (assets, calc) = match load_watchlist(&adapter) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let selected = select_assets(assets, symbol);
    if selected.is_empty() {
        match symbol {
            Some(wanted) => eprintln!("error: asset {} not found or disabled", wanted),
            None => eprintln!("error: no enabled assets in watchlist"),
        }
        let err = SwingwatchError::NoData {
            symbol: symbol.unwrap_or("watchlist").to_string(),
        };
        return ExitCode::from(&err);
    }

    let quotes = match build_quote_port(&adapter) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let history = build_history_adapter(&adapter);
    let notifier = match build_notifier(&adapter) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!("Evaluating {} asset(s)...", selected.len());
    let evaluated = run_cycle(&selected, &quotes, &history, notifier.as_ref(), &calc, true);
    eprintln!(
        "Done: {} evaluated, {} skipped",
        evaluated,
        selected.len() - evaluated
    );

    ExitCode::SUCCESS
}

fn run_watch(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (assets, calc) = match load_watchlist(&adapter) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let selected = select_assets(assets, None);
    if selected.is_empty() {
        eprintln!("error: no enabled assets in watchlist");
        return ExitCode::from(2);
    }

    let settings = match build_watch_settings(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let schedule = match build_schedule(settings.interval_minutes) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let quotes = match build_quote_port(&adapter) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let history = build_history_adapter(&adapter);
    let notifier = match build_notifier(&adapter) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!(
        "Watching {} asset(s) every {} minute(s), {} day(s) of history retained",
        selected.len(),
        settings.interval_minutes,
        settings.retention_days
    );

    // Initial cycle right away, then follow the schedule.
    loop {
        for asset in &selected {
            if let Err(e) = history.prune_older_than(&asset.symbol, settings.retention_days) {
                eprintln!("warning: failed to prune {} history: {}", asset.symbol, e);
            }
        }

        eprintln!("\n=== Cycle at {} ===", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        let evaluated = run_cycle(&selected, &quotes, &history, notifier.as_ref(), &calc, false);
        eprintln!(
            "Cycle done: {} evaluated, {} skipped",
            evaluated,
            selected.len() - evaluated
        );

        let now = Utc::now();
        match schedule.after(&now).next() {
            Some(next_tick) => {
                let wait = (next_tick - now).to_std().unwrap_or_default();
                eprintln!("Next cycle at {}", next_tick.format("%Y-%m-%d %H:%M:%S"));
                std::thread::sleep(wait);
            }
            None => {
                eprintln!("error: schedule has no upcoming ticks");
                return ExitCode::from(1);
            }
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let schedule = match build_fee_schedule(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let assets = match build_asset_configs(&adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let settings = match build_watch_settings(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    if let Err(e) = build_schedule(settings.interval_minutes) {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }

    eprintln!(
        "\nFees: maker {}%, taker {}%, tax {}%",
        schedule.maker_fee_pct, schedule.taker_fee_pct, schedule.tax_rate_pct
    );
    eprintln!(
        "Schedule: every {} minute(s), {} day(s) retention",
        settings.interval_minutes, settings.retention_days
    );

    eprintln!("\nWatchlist ({} assets):", assets.len());
    for asset in &assets {
        let state = if asset.is_holding() {
            format!("holding {} @ {}", asset.shares, asset.entry)
        } else {
            "no position".to_string()
        };
        let enabled = if asset.enabled { "enabled" } else { "disabled" };
        eprintln!("  {} [{}] — {}", asset.symbol, enabled, state);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbols: Vec<String> = match symbol {
        Some(s) => vec![s.to_uppercase()],
        None => match adapter.get_string("watchlist", "symbols") {
            Some(list) => parse_symbols(&list),
            None => {
                eprintln!("error: no symbols configured");
                return ExitCode::from(2);
            }
        },
    };

    let history = build_history_adapter(&adapter);
    for sym in &symbols {
        match history.read_history(sym, None) {
            Ok(samples) if samples.is_empty() => {
                eprintln!("{}: no history", sym);
            }
            Ok(samples) => {
                let first = format_timestamp(samples[0].fetched_at);
                let last = format_timestamp(samples[samples.len() - 1].fetched_at);
                println!("{}: {} samples, {} to {}", sym, samples.len(), first, last);
            }
            Err(e) => {
                eprintln!("error reading {} history: {}", sym, e);
            }
        }
    }

    ExitCode::SUCCESS
}

fn load_watchlist(
    adapter: &FileConfigAdapter,
) -> Result<(Vec<AssetConfig>, FeeCalculator), ExitCode> {
    let schedule = build_fee_schedule(adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    let assets = build_asset_configs(adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok((assets, FeeCalculator::new(schedule)))
}

fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}
