use crate::allocate::{run_allocate, AllocateArgs};
use crate::server;
use bed_allocator::allocation::SeverityPolicy;
use bed_allocator::config::AppConfig;
use bed_allocator::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Bed Allocator",
    about = "Triage dengue patients and allocate general or ICU beds against capacity forecasts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify one patient and print the allocation decision
    Allocate(AllocateArgs),
}

/// Dataset and policy overrides shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct DatasetArgs {
    /// Override the forecast CSV export
    #[arg(long)]
    pub(crate) forecast_csv: Option<PathBuf>,
    /// Override the distance matrix CSV
    #[arg(long)]
    pub(crate) distance_csv: Option<PathBuf>,
    /// Severity rubric: weighted or threshold
    #[arg(long)]
    pub(crate) policy: Option<SeverityPolicy>,
}

impl DatasetArgs {
    pub(crate) fn apply(self, config: &mut AppConfig) {
        if let Some(path) = self.forecast_csv {
            config.allocation.forecast_csv = path;
        }
        if let Some(path) = self.distance_csv {
            config.allocation.distance_csv = path;
        }
        if let Some(policy) = self.policy {
            config.allocation.severity_policy = policy;
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Allocate(args) => run_allocate(args),
    }
}
