// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use templ_iconify::catalog::{CatalogClient, IconifyClient};
use templ_iconify::config::IconifyConfig;
use templ_iconify::download::{self, DownloadCoordinator};
use templ_iconify::error::exit_codes::*;
use templ_iconify::error::IconifyError;
use templ_iconify::progress::{spinner, DownloadView};
use templ_iconify::resolver::Resolver;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Download icons from Iconify and generate templ components for them.
#[derive(Parser, Debug)]
#[command(name = "templ-iconify")]
#[command(version = VERSION)]
#[command(about = "Download icons from Iconify and generate templ components for them.")]
#[command(long_about = "templ-iconify - Iconify icons as templ components\n\n\
    Single icon:         templ-iconify mdi:home\n\
    Prefix wildcard:     templ-iconify \"mdi:home-*\"\n\
    Whole collection:    templ-iconify \"solar:*\"\n\
    Custom output:       templ-iconify mdi:home -o ./components/icons/\n\n\
    Each icon is written to <out>/<collection>/<icon>.templ.")]
struct Cli {
    /// Icon specifiers in collection:name form; `*` matches any run of characters
    #[arg(required = true, value_name = "SPECIFIER")]
    specifiers: Vec<String>,

    /// Output directory [default: ./icons/]
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Number of concurrent download workers [default: 10]
    #[arg(short, long, value_name = "N")]
    worker: Option<usize>,

    /// Iconify API base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Resolve and list matching icons without downloading them
    #[arg(long)]
    dry_run: bool,

    /// Verbose mode: -v for progress logs, -vv for per-request logs
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Quiet mode: no spinner or progress bar, errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,templ_iconify={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, config file and environment, then CLI flags on top.
fn build_config(cli: &Cli) -> Result<IconifyConfig> {
    let mut config = IconifyConfig::load().context("Failed to load configuration")?;
    if let Some(out) = &cli.out {
        config.save_dir = out.clone();
    }
    if let Some(workers) = cli.worker {
        config.worker_count = workers;
    }
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

fn report_failure(err: &IconifyError) -> i32 {
    tracing::debug!("run failed: {:?}", err);
    eprintln!("{}", err.report());
    err.exit_code()
}

async fn run(cli: Cli) -> i32 {
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "[✗]".red(), e);
            return USAGE;
        }
    };

    let catalog: Arc<dyn CatalogClient> = match IconifyClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("{} {:#}", "[✗]".red(), e);
            return ERROR;
        }
    };

    let finding = if cli.quiet {
        spinner::hidden()
    } else {
        spinner::create("Finding icons...")
    };
    let icons = match Resolver::new(catalog.clone()).resolve(&cli.specifiers).await {
        Ok(icons) => {
            spinner::finish_success(&finding, &format!("Found {} icons", icons.len()));
            icons
        }
        Err(e) => {
            spinner::clear(&finding);
            return report_failure(&e);
        }
    };

    if cli.dry_run {
        for icon in &icons {
            println!("{}", icon);
        }
        return SUCCESS;
    }

    let total = icons.len();
    let coordinator = DownloadCoordinator::new(catalog, &config);
    let (sink, receiver) = download::channel();
    let view = if cli.quiet {
        DownloadView::hidden(total)
    } else {
        DownloadView::new(total)
    };
    let view_task = tokio::spawn(view.run(receiver));

    let outcome = tokio::select! {
        result = coordinator.run(icons, Arc::new(sink)) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    let Some(result) = outcome else {
        view_task.abort();
        eprintln!("\n{} Interrupted", "[!]".yellow());
        return INTERRUPTED;
    };

    // The sink always receives Terminate, so the view exits on its own.
    if let Err(e) = view_task.await {
        tracing::warn!("progress view ended abnormally: {}", e);
    }

    match result {
        Ok(summary) => {
            tracing::info!(saved = summary.saved, dir = %config.save_dir.display(), "done");
            if !cli.quiet {
                println!("{}", format!("Saved to {}", config.save_dir.display()).dimmed());
            }
            SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let code = match tokio::runtime::Runtime::new().context("Failed to create Tokio runtime") {
        Ok(runtime) => runtime.block_on(run(cli)),
        Err(e) => {
            eprintln!("{} {:#}", "[✗]".red(), e);
            ERROR
        }
    };
    std::process::exit(code);
}
