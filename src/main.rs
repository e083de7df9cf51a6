use std::path::PathBuf;

use anyhow::Context;

mod api;
mod app;
mod config;
mod db;
mod error;
mod input;
mod models;
mod paths;
mod report;
mod scenarios;
mod web;

use app::App;
use config::Config;
use error::Result;
use paths::ProjectPaths;
use scenarios::Scenario;

const USAGE: &str = "usage: weather-qa [--root DIR] [status|city-weather|city-id-weather|highest-average|discrepancy|all]...";

#[tokio::main]
async fn main() -> Result<()> {
    // Progress goes to stderr; RUST_LOG replaces the INFO default when set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((root, scenarios)) = parse_args(&args)? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let paths = ProjectPaths::discover(root);
    let config = Config::load(&paths).map_err(|e| {
        anyhow::anyhow!("loading config under {}: {}", paths.root().display(), e)
    })?;

    let app = App::new(config)?;
    let reports = app.run(&scenarios).await;

    let mut failed_cases = 0;
    for report in &reports {
        println!(
            "{:<16} passed {:>3}  failed {:>3}",
            report.scenario.name(),
            report.passed.len(),
            report.failed.len()
        );
        if !report.is_success() {
            for (case, reason) in &report.failed {
                println!("    {}: {}", case, reason);
            }
            failed_cases += report.failed.len();
        }
    }

    if failed_cases > 0 {
        return Err(anyhow::anyhow!("{} scenario case(s) failed", failed_cases).into());
    }
    Ok(())
}

/// `None` when help was asked for.
fn parse_args(args: &[String]) -> Result<Option<(Option<PathBuf>, Vec<Scenario>)>> {
    let mut root = None;
    let mut scenarios = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--root" => {
                let dir = iter.next().context(USAGE)?;
                root = Some(PathBuf::from(dir));
            }
            "all" => scenarios.extend(Scenario::ALL),
            "-h" | "--help" => return Ok(None),
            name => scenarios.push(name.parse()?),
        }
    }

    if scenarios.is_empty() {
        scenarios.extend(Scenario::ALL);
    }
    Ok(Some((root, scenarios)))
}
