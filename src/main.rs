//! vrdock - head-locked VR control surface
//!
//! Headless driver: builds the stock dock, replays scripted controller input
//! and optionally writes every dispatched event as JSONL.

mod config;
mod headless;
mod scripted_input;
mod stock;

use anyhow::Result;
use config::AppConfig;
use std::{env, path::PathBuf};
use tracing::info;

const DEFAULT_DT: f32 = 1.0 / 72.0;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting vrdock v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let app = AppConfig::load_from_path(&config_path);

    if let Some(path) = cli.write_config.as_deref() {
        app.save_to_path(path)?;
        info!(path = %path.display(), "wrote effective configuration");
        return Ok(());
    }

    let summary = headless::run(headless::HeadlessConfig {
        app,
        scripted_input: cli.scripted_input,
        event_log: cli.event_log,
        max_ticks: cli.max_ticks,
        dt: cli.dt,
    })?;

    println!(
        "ticks={} events={} haptic_pulses={} head_tracking={} head_lock={} raised_shapes={}{}{}",
        summary.ticks,
        summary.events,
        summary.haptic_pulses,
        summary.head_tracking,
        summary.head_lock_icon.as_deref().unwrap_or("none"),
        summary.raised_shapes,
        if summary.script_finished { "" } else { " script=unfinished" },
        summary
            .crank_value
            .map(|value| format!(" crank={value:.3}"))
            .unwrap_or_default()
    );
    Ok(())
}

#[derive(Debug, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    write_config: Option<PathBuf>,
    scripted_input: Option<PathBuf>,
    event_log: Option<PathBuf>,
    max_ticks: Option<u64>,
    dt: f32,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: None,
            write_config: None,
            scripted_input: None,
            event_log: None,
            max_ticks: None,
            dt: DEFAULT_DT,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--write-config" => {
                    if let Some(path) = args.next() {
                        opts.write_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--write-config requires a file path");
                    }
                }
                "--scripted-input" => {
                    if let Some(path) = args.next() {
                        opts.scripted_input = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--scripted-input requires a file path");
                    }
                }
                "--event-log" => {
                    if let Some(path) = args.next() {
                        opts.event_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--event-log requires a file path");
                    }
                }
                "--max-ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--max-ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--max-ticks requires an integer");
                    }
                }
                "--dt" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<f32>() {
                            Ok(value) if value >= 0.0 => opts.dt = value,
                            Ok(value) => {
                                tracing::error!(value, "--dt must not be negative");
                            }
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--dt must be a number of seconds");
                            }
                        }
                    } else {
                        tracing::error!("--dt requires a number of seconds");
                    }
                }
                other => {
                    tracing::warn!(arg = other, "ignoring unknown argument");
                }
            }
        }

        opts
    }
}
