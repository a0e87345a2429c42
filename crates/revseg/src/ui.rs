use crate::cli::Format;
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use revseg_client::state::{SegmentState, View};
use revseg_common::chart::{self, ListRow, PieSector};
use revseg_common::{Segment, TickerSymbol};
use serde::Serialize;
use std::time::Duration;

const BAR_WIDTH: usize = 40;
const EMPTY_PROMPT: &str = "Please enter a ticker symbol and press Enter (Ctrl-D to quit)";

/// Spinner shown while a request is in flight.
pub fn spinner(msg: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

pub fn prompt() {
    println!("{}", EMPTY_PROMPT.dimmed());
}

/// Everything printed for one breakdown, in the shape written by `--format json`.
#[derive(Serialize, Debug)]
pub struct Report<'a> {
    pub symbol: Option<&'a TickerSymbol>,
    pub period: Option<&'a str>,
    pub total: f64,
    pub rows: Vec<ListRow>,
    pub sectors: Vec<PieSector>,
}

impl<'a> Report<'a> {
    pub fn new(
        symbol: Option<&'a TickerSymbol>,
        period: Option<&'a str>,
        segments: &[Segment],
    ) -> Self {
        Self {
            symbol,
            period,
            total: chart::total(segments),
            rows: chart::list_rows(segments),
            sectors: chart::pie(segments),
        }
    }
}

/// Print whatever `state` calls for.
pub fn render(state: &SegmentState, format: Format) -> Result<()> {
    let symbol = state
        .symbol
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_default();

    match state.view() {
        View::Idle => prompt(),
        View::Loading => eprintln!("{}", format!("{symbol}: loading ...").dimmed()),
        View::Failed(message) => eprintln!("{}", format!("{symbol}: {message}").red()),
        View::Empty | View::Loaded => {
            let report = Report::new(
                state.symbol.as_ref(),
                state.period.as_deref(),
                &state.segments,
            );
            print_report(&report, format)?;
        }
    }
    Ok(())
}

pub fn print_report(report: &Report, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Table => print!("{}", table(report)),
    }
    Ok(())
}

/// The list, share bars and total as printable text.
pub fn table(report: &Report) -> String {
    let symbol = report
        .symbol
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());

    if report.rows.is_empty() {
        return format!(
            "{}\n",
            format!("{symbol}: no revenue segments reported").dimmed()
        );
    }

    let mut out = String::new();
    let heading = match report.period {
        Some(period) => format!("{symbol} revenue by segment ({period})"),
        None => format!("{symbol} revenue by segment"),
    };
    out.push_str(&format!("{}\n", heading.bold()));

    let name_width = report
        .rows
        .iter()
        .map(|row| row.category.chars().count())
        .max()
        .unwrap_or(0);
    let amount_width = report
        .rows
        .iter()
        .map(|row| row.amount.len())
        .max()
        .unwrap_or(0);

    for (row, sector) in report.rows.iter().zip(&report.sectors) {
        let filled = (sector.share.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        let bar = "█".repeat(filled);
        let name = format!("{:<name_width$}", row.category);
        let amount = format!("{:>amount_width$}", row.amount);
        let (marker, name, bar) = if sector.emphasized {
            ("*", name.bold(), bar.yellow())
        } else {
            (" ", name.normal(), bar.cyan())
        };
        out.push_str(&format!(
            "{marker} {name}  {}  {:>5.1}%  {bar}\n",
            amount.dimmed(),
            sector.share * 100.0,
        ));
    }

    out.push_str(&format!(
        "  {:<name_width$}  {:>amount_width$}\n",
        "Total",
        chart::format_currency(report.total)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(pairs: &[(&str, f64)]) -> Vec<Segment> {
        pairs.iter().map(|(c, v)| Segment::new(*c, *v)).collect()
    }

    #[test]
    fn table_marks_the_largest_segment() {
        colored::control::set_override(false);
        let ticker = TickerSymbol::parse("aapl").unwrap();
        let s = segments(&[("A", 10.0), ("B", 30.0), ("C", 5.0)]);
        let text = table(&Report::new(Some(&ticker), Some("2024"), &s));

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "AAPL revenue by segment (2024)");
        assert!(lines[1].starts_with("  A"));
        assert!(lines[2].starts_with("* B"));
        assert!(lines[2].contains("$30.00"));
        assert!(lines[2].contains("66.7%"));
        assert!(lines[4].contains("$45.00"));
    }

    #[test]
    fn empty_report_says_so() {
        colored::control::set_override(false);
        let ticker = TickerSymbol::parse("zzzz").unwrap();
        let text = table(&Report::new(Some(&ticker), None, &[]));
        assert_eq!(text, "ZZZZ: no revenue segments reported\n");
    }

    #[test]
    fn report_serializes_rows_and_sectors() {
        let s = segments(&[("iPhone", 200.5), ("Services", 85.2)]);
        let json = serde_json::to_value(Report::new(None, Some("2024"), &s)).unwrap();

        assert_eq!(json["period"], "2024");
        assert_eq!(json["rows"][0]["amount"], "$200.50");
        assert_eq!(json["sectors"][0]["emphasized"], true);
        assert_eq!(json["sectors"][1]["outer_radius"], 1.0);
    }
}
