use crate::demo::{run_demo, run_lenders, run_match, DemoArgs, LendersArgs, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_match::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Student Loan Matcher",
    about = "Compare education-loan lenders and run the matching service from the command line",
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
    /// Rank lenders for a single borrower
    Match(MatchArgs),
    /// List the lender catalog
    Lenders(LendersArgs),
    /// Walk through matching, waitlist sign-up and the document checklist
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
    /// Load lenders from a JSON or CSV file instead of the bundled catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
        Command::Lenders(args) => run_lenders(args),
        Command::Demo(args) => run_demo(args),
    }
}
