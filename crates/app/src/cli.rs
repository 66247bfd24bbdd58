use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Financial health reports over a ledger of income and expenses")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, env = "FOLIO_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the full report as JSON.
    Report(ReportArgs),
    /// Print the profitability ranking of a creator's cost centers.
    Creator(CreatorArgs),
}

#[derive(Args, Debug)]
pub struct Sources {
    /// Ledger file (`.csv` or `.json`).
    #[arg(long, env = "FOLIO_LEDGER")]
    pub ledger: PathBuf,
    /// Catalog file with category, cost-center and creator metadata.
    #[arg(long, env = "FOLIO_CATALOG")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub sources: Sources,
    /// First day of the range (inclusive, `YYYY-MM-DD`).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day of the range (inclusive, `YYYY-MM-DD`).
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Restrict the report to these cost centers. Repeatable.
    #[arg(long = "cost-center")]
    pub cost_centers: Vec<String>,
    /// Detail-list page (1-based).
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CreatorArgs {
    #[command(flatten)]
    pub sources: Sources,
    /// Creator identifier as listed in the catalog.
    #[arg(long)]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_command() {
        let cli = Cli::try_parse_from([
            "folio",
            "report",
            "--ledger",
            "ledger.csv",
            "--from",
            "2024-01-01",
            "--to",
            "2024-03-31",
            "--cost-center",
            "BOOK-1",
            "--cost-center",
            "BOOK-2",
            "--page-size",
            "50",
        ])
        .unwrap();

        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.sources.ledger, PathBuf::from("ledger.csv"));
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(args.cost_centers, vec!["BOOK-1", "BOOK-2"]);
        assert_eq!(args.page, 1);
        assert_eq!(args.page_size, Some(50));
    }

    #[test]
    fn creator_requires_id() {
        assert!(Cli::try_parse_from(["folio", "creator", "--ledger", "l.json"]).is_err());
    }
}
