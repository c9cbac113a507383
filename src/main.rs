//! Simulation Matcher - CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use simulation_matcher::{
    MatchError, RequestDetails, RequestResponsePairView, RequestTemplateStore, SimulationConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "simulation-matcher",
    about = "Match HTTP requests against simulation templates",
    version
)]
struct Args {
    /// Path to simulation file (YAML, or JSON with a .json extension)
    #[arg(short, long, default_value = "simulation.yaml")]
    config: PathBuf,

    /// JSON file holding a request to match
    #[arg(short, long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Allow stateful selection during the lookup
    #[arg(long)]
    stateful: bool,

    /// Print every loaded template as JSON and exit
    #[arg(long)]
    list: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.print_config {
        let default_config = include_str!("../config/default-simulation.yaml");
        println!("{}", default_config);
        return Ok(ExitCode::SUCCESS);
    }

    let config = if args.config.exists() {
        info!(path = ?args.config, "Loading simulation");
        SimulationConfig::from_file(&args.config)?
    } else if args.validate || args.list || args.request.is_some() {
        anyhow::bail!("Simulation file not found: {:?}", args.config);
    } else {
        info!("Using empty simulation (no templates)");
        SimulationConfig::default()
    };

    if args.validate {
        println!(
            "Configuration is valid ({} templates defined)",
            config.templates.len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    if args.list {
        let views: Vec<RequestResponsePairView> =
            config.templates.iter().map(|pair| pair.to_view()).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(request_path) = args.request else {
        info!(templates = config.templates.len(), "Nothing to match; pass --request");
        return Ok(ExitCode::SUCCESS);
    };

    let content = std::fs::read_to_string(&request_path)
        .with_context(|| format!("Failed to read request {}", request_path.display()))?;
    let request: RequestDetails =
        serde_json::from_str(&content).context("Request file is not a valid request")?;

    let (simulation, settings) = config.into_parts()?;
    let store = RequestTemplateStore::new(settings);

    match store.get_response(&request, args.stateful, &simulation) {
        Ok(Some(response)) => {
            println!("{}", serde_json::to_string_pretty(response)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            eprintln!("No template matched the request");
            Ok(ExitCode::from(1))
        }
        Err(e @ MatchError::MalformedBodyComparison { .. }) => {
            eprintln!("Body template error: {}", e);
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}
