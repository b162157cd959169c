use crate::demo::{run_demo, run_roster_inspect, DemoArgs, RosterInspectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use hostel_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hostel Desk",
    about = "Run the hostel back-office service and onboarding demos from the command line",
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
    /// Work with roster exports used to seed the room catalog
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Run an end-to-end onboarding demo against in-memory adapters
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Summarize a roster CSV export without starting the service
    Inspect(RosterInspectArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Roster CSV export used to seed the room catalog
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Roster {
            command: RosterCommand::Inspect(args),
        } => run_roster_inspect(args),
        Command::Demo(args) => run_demo(args),
    }
}
