use crate::demo::{run_demo, run_projection, DemoArgs, ProjectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use saskatoon::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Saskatoon",
    about = "Serve and inspect the harvest coordination read model from the command line",
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
    /// Print one projection of the loaded snapshot as JSON
    Project(ProjectArgs),
    /// Walk through the bundled demo snapshot: directory, calendar, and inventories
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Snapshot document to serve instead of SASKATOON_SEED_PATH
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Project(args) => run_projection(args),
        Command::Demo(args) => run_demo(args),
    }
}
