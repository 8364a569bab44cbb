use crate::{
    config::load_config,
    render::{Report, SectionError, render_json, render_text},
    sections::{Dashboard, Section},
};
use anyhow::Error;
use chrono::Utc;
use clap::Parser;
use common::{DataSource, HttpDataSource};
use futures::future::join_all;
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod format;
mod render;
mod sections;

#[derive(Parser)]
#[command(name = "dashboard", version)]
#[command(about = "HNT, MOBILE and IOT token statistics", long_about = None)]
struct Args {
    /// Section to render
    #[arg(short, long, value_enum, default_value_t = Section::All)]
    section: Section,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Stats config file (defaults to STATS_CONFIG, then stats.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// renders every requested section; `Ok(false)` when any of them failed
async fn run(args: &Args) -> Result<bool, Error> {
    let config = load_config(args.config.as_deref())?;
    let source: Arc<dyn DataSource> = Arc::new(HttpDataSource::new(
        config.endpoints.clone(),
        config.epochs.clock(),
    ));
    let dashboard = Dashboard::new(source, config.emissions, config.epochs.delegation());
    let today = Utc::now().date_naive();

    let sections = args.section.expand();
    let results = join_all(
        sections
            .iter()
            .map(|section| dashboard.section(*section, today)),
    )
    .await;

    let mut report = Report {
        sections: Vec::new(),
        errors: Vec::new(),
    };
    for (section, result) in sections.into_iter().zip(results) {
        match result {
            Ok(output) => report.sections.push(output),
            Err(err) => {
                warn!(%section, "section failed: {err:#}");
                report.errors.push(SectionError {
                    section,
                    error: format!("{err:#}"),
                });
            }
        }
    }

    if args.json {
        println!("{}", render_json(&report)?);
    } else {
        println!("{}", render_text(&report));
        for failed in &report.errors {
            eprintln!("error: {} section failed: {}", failed.section, failed.error);
        }
    }
    Ok(report.errors.is_empty())
}
