#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `bolus`: command line front-end for the dose recommendation engine.

mod advise;
mod cli;
mod error_fmt;
mod logging;

use std::path::Path;

use bolus_core::DoseError;
use bolus_traits::{Clock, FixedClock, SystemClock};
use clap::Parser;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

/// Load the config file; the default path may be absent, an explicit one may not.
fn load_config(path: &Path) -> eyre::Result<bolus_config::Config> {
    if !path.exists() {
        if path == Path::new(DEFAULT_CONFIG) {
            return Ok(bolus_config::Config::default());
        }
        eyre::bail!("config file {:?} not found", path);
    }
    bolus_config::load_file(path)
        .map_err(|e| DoseError::InvalidConfiguration(format!("{e:#}")).into())
}

fn clock_for(now: Option<chrono::DateTime<chrono::Utc>>) -> Box<dyn Clock> {
    match now {
        Some(t) => Box::new(FixedClock::new(t)),
        None => Box::new(SystemClock::new()),
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli.config)?;
    logging::init(&cli.log_level, cli.json, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");
    let engine = advise::engine_from(&cfg)?;

    match cli.cmd {
        Commands::Recommend {
            bg,
            carbs,
            trend,
            target,
            history,
            readings,
            now,
        } => {
            let clock = clock_for(now);
            advise::run_recommend(
                &engine,
                clock.as_ref(),
                bg,
                carbs,
                trend,
                target,
                history.as_deref(),
                readings.as_deref(),
                cli.json,
            )?;
        }
        Commands::Iob { history, now } => {
            let clock = clock_for(now);
            advise::run_iob(&engine, clock.as_ref(), &history, cli.json)?;
        }
        Commands::Clamp { raw } => {
            advise::run_clamp(&engine, raw, cli.json)?;
        }
        Commands::CheckConfig => advise::run_check_config(&engine, cli.json),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if !cli.json {
        let _ = color_eyre::install();
    }

    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "request refused");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}
