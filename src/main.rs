use anyhow::Context;
use clap::Parser;
use roomfinder::cli::Args;
use roomfinder::config::Config;
use roomfinder::filters::{ConfigError, SearchFilters};
use roomfinder::logging::setup_logging;
use roomfinder::pipeline::{self, RunOptions};
use roomfinder::portal::PortalClient;
use roomfinder::report::{self, FormatOptions};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Config has to exist before logging, so report this one failure directly
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::from(2);
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        "starting roomfinder"
    );

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<ConfigError>().is_some() => {
            error!(error = %e, "invalid arguments");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = ?e, "run failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    // Validate before touching the network
    let filters = SearchFilters::combinations(&args.search, &args.buildings, &args.usages)?;

    let workers = args
        .threads
        .map(usize::from)
        .unwrap_or(config.default_threads);
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers.into());
    }

    let nav_base = Url::parse(&config.nav_base_url).context("Invalid nav_base_url")?;
    let portal = Arc::new(PortalClient::from_config(&config).context("Failed to create portal client")?);

    let buildings: Vec<&str> = args.buildings.iter().map(|b| b.label()).collect();
    let usages: Vec<&str> = args.usages.iter().map(|u| u.label()).collect();
    info!(
        ?buildings,
        ?usages,
        searches = filters.len(),
        workers,
        search_text = args.search.as_str(),
        "configuration loaded"
    );

    let options = RunOptions {
        workers,
        max_pages: config.max_pages,
        nav_base: Some(nav_base),
    };
    let reports = pipeline::run(portal, &filters, &options, pipeline::portal_now).await?;

    let color = !args.no_color && std::io::stdout().is_terminal();
    print!("{}", report::format(reports, FormatOptions { color }));
    Ok(())
}
