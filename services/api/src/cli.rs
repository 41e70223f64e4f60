use crate::demo::{run_challenges, run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use skillgate::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SkillGate Evaluation Service",
    about = "Score candidate repositories against challenge rubrics from the command line",
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
    /// List the challenge rubrics the service would score against
    Challenges,
    /// Score a sample (or provided) evidence set and print the scorecard
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
        Command::Challenges => run_challenges(),
        Command::Demo(args) => run_demo(args),
    }
}
