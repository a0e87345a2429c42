use clap::{Parser, Subcommand, ValueEnum};
use revseg_client::config::Period;
use revseg_common::TickerSymbol;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of logging; `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and display the latest revenue-by-segment breakdown of a company.
    Fetch {
        ticker: TickerSymbol,

        #[command(flatten)]
        request: RequestArgs,

        #[arg(long, default_value = "table")]
        format: Format,
    },

    /// Display a revenue-segmentation response saved to disk.
    Parse {
        file: PathBuf,

        #[arg(long, default_value = "table")]
        format: Format,
    },

    /// Read ticker symbols from stdin, fetching each as soon as it is entered.
    Interactive {
        #[command(flatten)]
        request: RequestArgs,

        #[arg(long, default_value = "table")]
        format: Format,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct RequestArgs {
    /// Reporting period to request.
    #[arg(long, default_value = "annual")]
    pub period: PeriodArg,

    /// Decode the body even when the provider answers with a non-2xx status.
    #[arg(long)]
    pub ignore_status: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PeriodArg {
    Annual,
    Quarter,
}

impl From<PeriodArg> for Period {
    fn from(value: PeriodArg) -> Self {
        match value {
            PeriodArg::Annual => Period::Annual,
            PeriodArg::Quarter => Period::Quarter,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    /// Coloured list plus share bars.
    Table,
    /// Rows and pie sectors as JSON.
    Json,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_defaults() {
        let cli = Cli::try_parse_from(["revseg", "fetch", "aapl"]).unwrap();
        match cli.command {
            Commands::Fetch {
                ticker,
                request,
                format,
            } => {
                assert_eq!(ticker.as_str(), "AAPL");
                assert_eq!(request.period, PeriodArg::Annual);
                assert!(!request.ignore_status);
                assert_eq!(format, Format::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn fetch_with_options() {
        let cli = Cli::try_parse_from([
            "revseg",
            "fetch",
            "msft",
            "--period",
            "quarter",
            "--ignore-status",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        let Commands::Fetch { request, format, .. } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(Period::from(request.period), Period::Quarter);
        assert!(request.ignore_status);
        assert_eq!(format, Format::Json);
    }

    #[test]
    fn empty_ticker_is_rejected() {
        assert!(Cli::try_parse_from(["revseg", "fetch", " "]).is_err());
    }
}
