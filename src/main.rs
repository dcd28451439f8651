//! AxioVision montage importer - command line entry point.
//!
//! Dispatches the preflight and import subcommands and renders the montage
//! report.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axio_montage::{
    config::{Cli, Command, RunArgs},
    ImageFileReader, ImportMode, ImportOutcome, LumaConverter, MontageImporter,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Preflight(args) => run(args, ImportMode::Preflight),
        Command::Import(args) => run(args, ImportMode::Execute),
    }
}

fn run(args: RunArgs, mode: ImportMode) -> ExitCode {
    init_logging(args.verbose);

    let config = args.to_config();
    let mut importer = MontageImporter::new(config, ImageFileReader, LumaConverter);

    let outcome = match importer.run(mode) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(code = e.code(), "{e}");
            return ExitCode::FAILURE;
        }
    };

    print_summary(&outcome);

    if let Some(path) = &args.report {
        if let Err(e) = write_report(path, &outcome) {
            error!("could not write report to {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        info!("report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_summary(outcome: &ImportOutcome) {
    let report = &outcome.report;
    info!("{}", report.montage_information);
    info!(
        "  grid: {} row(s) x {} column(s)",
        report.row_count, report.column_count
    );
    for name in outcome.container.matrix_names() {
        let Ok(matrix) = outcome.container.matrix(name) else {
            continue;
        };
        info!(
            "  matrix '{}': {} array(s), {} tuple(s)",
            name,
            matrix.array_count(),
            matrix.tuple_count()
        );
    }
    if report.from_cache {
        info!("  (montage plan reused from cache)");
    }
}

fn write_report(path: &std::path::Path, outcome: &ImportOutcome) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(&outcome.report)?;
    std::fs::write(path, json)
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "axio_montage=debug"
    } else {
        "axio_montage=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
