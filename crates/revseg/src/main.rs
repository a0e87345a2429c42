use anyhow::{bail, Result};
use clap::Parser;
use cli::{Cli, Commands::*, Format, RequestArgs};
use revseg_client::prelude::*;
use revseg_common::TickerSymbol;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

mod cli;
mod ui;

fn preprocess(log_level: &'static str) {
    // grant access to .env
    dotenv::dotenv().ok();

    // initialise logger; RUST_LOG wins over --log-level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Provider settings from the environment, with the command line's overrides applied.
fn config(request: &RequestArgs) -> Result<Config> {
    let mut config = Config::from_env()?;
    config.period = request.period.into();
    if request.ignore_status {
        config.check_status = false;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    preprocess(cli.log_level.as_filter());
    log::trace!("Command line input recorded: {cli:#?}");

    // cli framework:
    // "> revseg <COMMAND>"
    match &cli.command {
        // "> revseg fetch AAPL [--period annual|quarter] [--format table|json]"
        // one fetch-display cycle
        Fetch {
            ticker,
            request,
            format,
        } => {
            let client = FmpClient::from_config(config(request)?)?;
            fetch_once(Tracker::new(client), ticker.clone(), *format).await?;
        }

        // "> revseg parse ./buffer/AAPL.json"
        // display a saved response, no network
        Parse { file, format } => {
            let set = revseg_common::fs::read_segments(file).await?;
            let report = ui::Report::new(None, set.period.as_deref(), &set.segments);
            ui::print_report(&report, *format)?;
        }

        // "> revseg interactive"
        // one fetch per line of stdin; only the latest answer is shown
        Interactive { request, format } => {
            let client = FmpClient::from_config(config(request)?)?;
            interactive(Tracker::new(client), *format).await?;
        }
    }

    Ok(())
}

async fn fetch_once(tracker: Tracker<FmpClient>, ticker: TickerSymbol, format: Format) -> Result<()> {
    let pb = ui::spinner(format!("Fetching revenue segments for {ticker} ..."))?;
    let outcome = tracker.fetch(ticker).await;
    pb.finish_and_clear();

    match outcome {
        FetchOutcome::Applied(View::Failed(message)) => bail!(message),
        FetchOutcome::Applied(_) => ui::render(&tracker.snapshot(), format)?,
        FetchOutcome::Skipped(e) => return Err(e.into()),
        // only one request was ever issued
        FetchOutcome::Stale => log::warn!("result superseded; nothing to show"),
    }
    Ok(())
}

/// One line of interactive input as a ticker. Blank, non-UTF-8 and invalid lines are
/// logged and skipped.
fn ticker_from_line(line: Vec<u8>) -> Option<TickerSymbol> {
    let line = match String::from_utf8(line) {
        Ok(line) => line,
        Err(e) => {
            log::warn!("ignoring input that is not valid UTF-8: {e}");
            return None;
        }
    };
    if line.trim().is_empty() {
        return None;
    }
    match TickerSymbol::parse(&line) {
        Ok(ticker) => Some(ticker),
        Err(e) => {
            log::warn!("ignoring input {line:?}: {e}");
            None
        }
    }
}

async fn interactive(tracker: Tracker<FmpClient>, format: Format) -> Result<()> {
    let tracker = Arc::new(tracker);
    ui::prompt();

    // render every published state; ends once the tracker is dropped
    let mut states = tracker.subscribe();
    let printer = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            if let Err(e) = ui::render(&state, format) {
                log::error!("failed to render state: {e}");
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let mut in_flight = JoinSet::new();
    while let Some(line) = lines.next_segment().await? {
        // reap whatever already finished
        while let Some(done) = in_flight.try_join_next() {
            log_join(done);
        }

        let Some(ticker) = ticker_from_line(line) else {
            continue;
        };
        let tracker = tracker.clone();
        in_flight.spawn(async move {
            if let FetchOutcome::Skipped(e) = tracker.fetch(ticker).await {
                log::error!("request not sent: {e}");
            }
        });
    }

    while let Some(done) = in_flight.join_next().await {
        log_join(done);
    }
    drop(tracker);
    printer.await?;

    Ok(())
}

fn log_join(done: Result<(), tokio::task::JoinError>) {
    if let Err(e) = done {
        log::error!("fetch task failed: {e}");
    }
}
