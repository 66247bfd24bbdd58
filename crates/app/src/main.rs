use std::io::Write;

use clap::Parser;
use engine::{DateRange, Engine, PageRequest, Scope};

use cli::{Cli, Command, CreatorArgs, ReportArgs, Sources};
use settings::Settings;

mod cli;
mod error;
mod loader;
mod settings;
mod views;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "folio={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let json = match cli.command {
        Command::Report(args) => report(&settings, args)?,
        Command::Creator(args) => creator(&settings, args)?,
    };

    let mut out = std::io::stdout().lock();
    writeln!(out, "{json}")?;
    Ok(())
}

fn build_engine(settings: &Settings, sources: &Sources) -> error::Result<Engine> {
    let ledger = loader::load_ledger(&sources.ledger)?;
    let catalog = loader::load_catalog(sources.catalog.as_deref())?;
    Ok(Engine::builder()
        .ledger(ledger)
        .catalog(catalog.clone())
        .creators(catalog)
        .config(settings.report.clone())
        .build()?)
}

fn report(settings: &Settings, args: ReportArgs) -> error::Result<String> {
    let engine = build_engine(settings, &args.sources)?;
    let scope = if args.cost_centers.is_empty() {
        Scope::All
    } else {
        Scope::CostCenters(args.cost_centers)
    };
    let range = match (args.from, args.to) {
        (None, None) => None,
        (from, to) => Some(DateRange::new(
            from.unwrap_or(chrono::NaiveDate::MIN),
            to.unwrap_or_else(|| chrono::Utc::now().date_naive()),
        )),
    };
    let request = PageRequest {
        page: args.page,
        page_size: args.page_size,
    };

    tracing::info!(?scope, ?range, "generating report");
    let report = engine.generate_report(&scope, range, request)?;
    Ok(serde_json::to_string_pretty(&views::report(&report))?)
}

fn creator(settings: &Settings, args: CreatorArgs) -> error::Result<String> {
    let engine = build_engine(settings, &args.sources)?;
    tracing::info!(creator = %args.id, "generating creator profitability");
    let rows = engine.generate_creator_profitability(&args.id)?;
    Ok(serde_json::to_string_pretty(&views::creator(&args.id, &rows))?)
}
