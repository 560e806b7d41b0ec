use clap::{Args, Parser, Subcommand};
use salesfloor::error::AppError;

use crate::demo::{run_demo, run_leaderboard, DemoArgs, LeaderboardArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Salesfloor Performance Service",
    about = "Run and demonstrate the predictive sales-performance engine from the command line",
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
    /// Analyze a sample showroom snapshot and print the leaderboard
    Leaderboard(LeaderboardArgs),
    /// Run an end-to-end CLI demo covering analysis and month-end forecasting
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leaderboard(args) => run_leaderboard(args),
        Command::Demo(args) => run_demo(args),
    }
}
