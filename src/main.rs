use std::{
    io::{self, Write},
    process::ExitCode,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use kingmaker::{
    app::{KingmakerApp, SearchRequest},
    cli::Cli,
    config,
    infrastructure::{cancel::{self, CancelHandle}, directories, logging},
    output::{self, OutputOptions},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let opts = OutputOptions {
        json: cli.json,
        verbose: cli.verbose,
    };

    match run(&cli, opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(target: "app", error = %format!("{err:#}"), "run failed");
            output::display_error(&mut io::stderr(), &err, opts);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, opts: OutputOptions) -> Result<()> {
    dotenvy::dotenv().ok();

    let query = cli
        .search_query()
        .ok_or_else(|| anyhow!("search query must not be empty"))?
        .to_string();

    let config = config::load_config().context("failed to load configuration")?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths, cli.verbose)?;

    let (handle, token) = CancelHandle::new();
    cancel::install_signal_handlers(handle.clone());
    if let Some(secs) = cli.timeout {
        handle.cancel_after(Duration::from_secs(secs));
    }

    let request = SearchRequest {
        query,
        max_results: cli.max_results.unwrap_or(config.default_max_results),
        include_all_videos: cli.include_all_videos,
    };

    let app = KingmakerApp::initialize(&config)?;

    let mut stderr = io::stderr();
    let progress = if request.include_all_videos {
        format!("Searching for \"{}\" (all durations)...", request.query)
    } else {
        format!("Searching for \"{}\" and verifying Shorts...", request.query)
    };
    output::display_progress(&mut stderr, &progress, opts);

    let videos = match app.run(&request, &token).await {
        Ok(videos) => videos,
        Err(err) if handle.is_cancelled() => return Err(err.context("run cancelled")),
        Err(err) => return Err(err),
    };

    let heading = if request.include_all_videos {
        "ALL VIDEOS"
    } else {
        "VERIFIED SHORTS"
    };
    let mut stdout = io::stdout().lock();
    output::display_videos(&mut stdout, heading, &videos, app.quota_used(), opts)?;
    stdout.flush()?;

    if opts.verbose && !opts.json {
        writeln!(stderr, "Quota used: {} units", app.quota_used())?;
    }
    Ok(())
}
