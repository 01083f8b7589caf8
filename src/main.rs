// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use gazette_watch::utils::logging::{format_step, format_success, format_warning};
use gazette_watch::{
    Config, JobDefinition, JobRegistry, JobRunner, TermSet, Validator, hash_offset,
};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "gazette_watch")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Scheduled term searches over the Diário Oficial da União", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the jobs found in the jobs directory
    Jobs,

    /// Print the deterministic offset of an identifier
    Offset {
        id: String,

        #[arg(short, long, default_value = "60")]
        modulus: NonZeroU32,
    },

    /// Resolve the search terms of a job and print them as JSON
    ResolveTerms {
        job: String,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run a job: search every term and write the report
    Run {
        job: String,

        /// Use terms from a file written by `resolve-terms`
        #[arg(long, value_name = "FILE")]
        terms: Option<PathBuf>,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    gazette_watch::utils::logging::init_logger(cli.color, cli.verbose);

    if let Commands::Offset { id, modulus } = &cli.command {
        return cmd_offset(id, *modulus);
    }

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Jobs => {
            cmd_jobs(&config)?;
        }
        Commands::Offset { .. } => {}
        Commands::ResolveTerms { job, output } => {
            cmd_resolve_terms(&config, &job, output.as_deref()).await?;
        }
        Commands::Run { job, terms, output } => {
            cmd_run(&config, &job, terms.as_deref(), output, cli.color).await?;
        }
    }

    Ok(())
}

fn load_registry(config: &Config) -> Result<JobRegistry> {
    let registry = JobRegistry::discover(&config.jobs.config_dir, &config.jobs.default_schedule)
        .with_context(|| {
            format!(
                "Failed to load jobs from {}",
                config.jobs.config_dir.display()
            )
        })?;
    info!("Loaded {} jobs", registry.len());
    Ok(registry)
}

fn find_job<'a>(registry: &'a JobRegistry, id: &str) -> Result<&'a JobDefinition> {
    registry
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown job `{}`", id))
}

fn cmd_offset(id: &str, modulus: NonZeroU32) -> Result<()> {
    println!("{}", hash_offset(id, modulus));
    Ok(())
}

fn cmd_jobs(config: &Config) -> Result<()> {
    let registry = load_registry(config)?;

    if registry.is_empty() {
        println!("{}", format_warning("No jobs found"));
        return Ok(());
    }

    for job in registry.jobs() {
        println!(
            "{}  [{}]  {}  ({})",
            job.id,
            job.schedule,
            Validator::truncate_text(&job.description, 60),
            job.terms.describe()
        );
    }

    Ok(())
}

async fn cmd_resolve_terms(config: &Config, job_id: &str, output: Option<&Path>) -> Result<()> {
    let registry = load_registry(config)?;
    let job = find_job(&registry, job_id)?;
    let runner = JobRunner::from_config(config)?;

    let terms = runner
        .resolve_terms(job)
        .await
        .with_context(|| format!("Failed to resolve terms of {}", job.id))?;
    let json = terms.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                format_success(&format!("{} terms written to {}", terms.len(), path.display()))
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

async fn cmd_run(
    config: &Config,
    job_id: &str,
    terms_file: Option<&Path>,
    output: Option<PathBuf>,
    colored: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let mut config = config.clone();
    if let Some(output) = output {
        config.report.output_dir = output;
    }

    println!("{}", format_step(1, 3, "Loading job"));
    let registry = load_registry(&config)?;
    let job = find_job(&registry, job_id)?;

    let terms = match terms_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(TermSet::from_json(&json)?)
        }
        None => None,
    };

    println!("{}", format_step(2, 3, "Searching"));
    let runner = JobRunner::from_config(&config)?.with_progress(colored);
    let summary = runner
        .run(job, terms)
        .await
        .with_context(|| format!("Run of job {} failed", job.id))?;

    println!("{}", format_step(3, 3, "Reporting"));
    let stats = &summary.stats;
    info!(
        "Searched {} terms, {} with results, {} results kept, {} signature matches discarded",
        stats.terms_searched,
        stats.terms_with_results,
        stats.results_kept,
        stats.signature_matches_discarded
    );
    info!(
        "{:.1} terms/min, {:.1}% of matches were signatures",
        stats.terms_per_minute(),
        stats.signature_rate()
    );

    match &summary.manifest {
        Some(manifest) => println!(
            "{}",
            format_success(&format!(
                "{} results for \"{}\" ready for {} recipients in {:.2}s",
                manifest.result_count,
                manifest.subject,
                manifest.recipients.len(),
                start_time.elapsed().as_secs_f64()
            ))
        ),
        None => println!("{}", format_warning("No results, nothing to send")),
    }

    Ok(())
}
