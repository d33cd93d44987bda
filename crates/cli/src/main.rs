use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use model::Job;
use server::{AppConfig, FailurePolicy, RunMode, telemetry};
use std::time::Instant;

/// Job Aggregator - merged job postings from several employer boards
#[derive(Parser)]
#[command(name = "job-aggregator")]
#[command(about = "Aggregates job postings from Amazon, League and Shopify", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured entrypoint (local HTTP server or Lambda handler)
    Serve {
        /// Port to listen on in local mode (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind in local mode (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Entrypoint to run (overrides MODE)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Run a single aggregation and print the result
    Fetch {
        /// Print the raw JSON body instead of a summary
        #[arg(long)]
        json: bool,

        /// Fail the whole search when any board fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// List the registered job boards
    Sources,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Local,
    Lambda,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Local => RunMode::Local,
            ModeArg::Lambda => RunMode::Lambda,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.telemetry).context("Failed to initialise logging")?;

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        host: None,
        mode: None,
    }) {
        Commands::Serve { port, host, mode } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(mode) = mode {
                config.mode = mode.into();
            }
            server::run(config).await?;
        }
        Commands::Fetch { json, fail_fast } => {
            if fail_fast {
                config.aggregation.failure_policy = FailurePolicy::FailFast;
            }
            handle_fetch(&config, json).await?;
        }
        Commands::Sources => handle_sources(&config)?,
    }

    Ok(())
}

/// Handle the 'fetch' command
async fn handle_fetch(config: &AppConfig, json: bool) -> Result<()> {
    let aggregator = server::build_aggregator(config)?;

    if json {
        let body = aggregator.collect_json().await?;
        println!("{body}");
        return Ok(());
    }

    let start = Instant::now();
    let jobs = aggregator.collect().await?;
    print_jobs(&jobs);
    println!(
        "{} {} jobs in {:.2?}",
        "✓".green(),
        jobs.len(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'sources' command
fn handle_sources(config: &AppConfig) -> Result<()> {
    let aggregator = server::build_aggregator(config)?;

    println!("{}", "Registered job boards:".bold().blue());
    for (index, name) in aggregator.source_names().iter().enumerate() {
        println!("{}. {}", (index + 1).to_string().green(), name);
    }
    println!(
        "Timeout per board: {:?}, failure policy: {:?}",
        config.aggregation.source_timeout,
        aggregator.policy()
    );
    Ok(())
}

/// Print a short listing grouped by company
fn print_jobs(jobs: &[Job]) {
    let mut current_company: Option<&str> = None;

    for job in jobs {
        if current_company != Some(job.company.as_str()) {
            println!("{}", job.company.bold().blue());
            current_company = Some(job.company.as_str());
        }

        println!("{}{}", "• ".green(), job.title);
        if !job.url.is_empty() {
            println!("    {}", job.url.dimmed());
        }
        for qualification in job.qualifications.iter().take(3) {
            println!("    - {qualification}");
        }
        if job.qualifications.len() > 3 {
            println!("    (+{} more)", job.qualifications.len() - 3);
        }
    }
}
