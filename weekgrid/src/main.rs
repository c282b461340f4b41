/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use weekgrid::config::GridConfig;
use weekgrid::page::Template;
use weekgrid::render_timetable;
use weekgrid::server::{self, TimetableService};
use weekgrid::source::{RecordSource, YamlRecordFile};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Weekly timetable grid renderer.
///
/// Example:
///   weekgrid render --records data/timetable.yaml --instructor xK
///   weekgrid serve -c weekgrid.yaml -p 8080
#[derive(Debug, Parser)]
#[command(
    name = "weekgrid",
    about = "Weekly timetable grid renderer",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the timetable once and print it to stdout.
    Render {
        #[command(flatten)]
        common: CommonArgs,

        /// Template file to fill; without it only the grid rows are printed.
        #[arg(short = 't', long = "template")]
        template: Option<PathBuf>,
    },

    /// Serve the timetable page over HTTP.
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Address to bind.
        #[arg(long = "host")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Path to the YAML configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// YAML lesson record file (overrides `source.records`).
    #[arg(short = 'r', long = "records")]
    records: Option<PathBuf>,

    /// Only show lessons of this instructor (overrides `source.instructor`).
    #[arg(short = 'i', long = "instructor")]
    instructor: Option<String>,
}

impl CommonArgs {
    fn load_config(&self) -> Result<GridConfig> {
        let mut config = match &self.config {
            Some(path) => GridConfig::load_from_file(path)?,
            None => {
                warn!("No configuration file provided, using defaults");
                GridConfig::default()
            }
        };

        if let Some(records) = &self.records {
            config.source.records = records.clone();
        }
        if let Some(instructor) = &self.instructor {
            config.source.instructor = Some(instructor.clone());
        }
        Ok(config)
    }
}

fn record_source(config: &GridConfig) -> YamlRecordFile {
    YamlRecordFile::new(&config.source.records).with_instructor(config.source.instructor.clone())
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_render(config: &GridConfig, template: Option<&PathBuf>) -> Result<()> {
    let records = record_source(config).fetch()?;
    let grid = render_timetable(records, &config.render)?;

    let output = match template {
        Some(path) => Template::load(path)?.fill(&config.template.placeholder, &grid),
        None => grid,
    };
    println!("{output}");
    Ok(())
}

async fn run_serve(config: GridConfig) -> Result<()> {
    let listener = server::bind(&config).await?;
    let source = Box::new(record_source(&config));
    let service = TimetableService::new(config, source)?;
    server::serve(listener, service).await
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render { common, template } => {
            let config = common.load_config()?;
            run_render(&config, template.as_ref())
        }
        Command::Serve { common, host, port } => {
            let mut config = common.load_config()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!(
                host = %config.server.host,
                port = config.server.port,
                records = %config.source.records.display(),
                "Configuration"
            );
            run_serve(config).await
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    // Logs go to stderr so `render` output stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        process::exit(1);
    }
}
