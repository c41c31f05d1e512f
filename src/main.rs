use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use outerplanar_mis::{
    ErrorResponse, GraphRequest, MisResponse, MisService, NodeId, ServiceConfig, ValidatorKind,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "outerplanar-mis", about = "Maximum independent sets of outerplanar graphs")]
struct Cli {
    /// Path to config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the node limit
    #[arg(long, global = true)]
    max_nodes: Option<usize>,
    /// Override the per-request time limit, in milliseconds
    #[arg(long, global = true)]
    time_limit_ms: Option<u64>,
    /// Override the outerplanarity test
    #[arg(long, global = true, value_enum)]
    validator: Option<ValidatorArg>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ValidatorArg {
    ForbiddenSubgraph,
    ApexPlanarity,
}

impl From<ValidatorArg> for ValidatorKind {
    fn from(arg: ValidatorArg) -> Self {
        match arg {
            ValidatorArg::ForbiddenSubgraph => ValidatorKind::ForbiddenSubgraph,
            ValidatorArg::ApexPlanarity => ValidatorKind::ApexPlanarity,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve one request and print the reply as JSON.
    Solve {
        /// Request file: {"nodes": [...], "edges": [[u, v], ...]}
        #[arg(long)]
        input: PathBuf,
    },
    /// Solve a JSON array of requests and write an array of replies.
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

/// Per-request entry of a batch output file.
#[derive(Serialize)]
#[serde(untagged)]
enum Outcome {
    Solved(MisResponse<NodeId>),
    Rejected(ErrorResponse),
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = MisService::new(load_config(&cli)?);

    match cli.command {
        Commands::Solve { input } => cmd_solve(&service, &input),
        Commands::Batch { input, output } => cmd_batch(&service, &input, &output),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_json_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(n) = cli.max_nodes {
        config.max_nodes = n;
    }
    if let Some(ms) = cli.time_limit_ms {
        config.time_limit_ms = Some(ms);
    }
    if let Some(v) = cli.validator {
        config.validator = v.into();
    }
    info!(?config, "using config");
    Ok(config)
}

fn cmd_solve(service: &MisService, input: &Path) -> anyhow::Result<ExitCode> {
    let request: GraphRequest<NodeId> = load_json(input)?;
    match service.compute(&request) {
        Ok(resp) => {
            println!("{}", serde_json::to_string(&resp)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", serde_json::to_string(&ErrorResponse::from(&e))?);
            Ok(if e.is_user_error() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            })
        }
    }
}

fn cmd_batch(service: &MisService, input: &Path, output: &Path) -> anyhow::Result<ExitCode> {
    let requests: Vec<GraphRequest<NodeId>> = load_json(input)?;
    info!("loaded {} requests from {}", requests.len(), input.display());

    let pb = ProgressBar::new(requests.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[solve] [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len}")?
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    let mut outcomes = Vec::with_capacity(requests.len());
    let mut rejected = 0usize;
    for request in &requests {
        let outcome = match service.compute(request) {
            Ok(resp) => Outcome::Solved(resp),
            Err(e) => {
                rejected += 1;
                Outcome::Rejected(ErrorResponse::from(&e))
            }
        };
        outcomes.push(outcome);
        pb.inc(1);
    }
    pb.finish_with_message("✔ batch complete");

    let writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(writer, &outcomes)?;
    info!(
        "solved {} of {} requests ({} rejected), wrote {}",
        outcomes.len() - rejected,
        outcomes.len(),
        rejected,
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
