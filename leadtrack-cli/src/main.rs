use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod state;

#[derive(Parser)]
#[command(name = "leadtrack", about = "Campaign attribution and funnel event tracking")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print events instead of appending them to the event log
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current attribution
    Attribution,
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// List logged funnel events
    Events(commands::events::EventsArgs),
    /// Clear session storage (a new browser session)
    Reset(commands::reset::ResetArgs),
    /// Record a funnel milestone on the current page
    Track(commands::track::TrackArgs),
    /// Load a page, capturing campaign parameters from its URL
    Visit(commands::visit::VisitArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Attribution => commands::attribution::run(),
        Commands::Config(args) => commands::config::run(args),
        Commands::Events(args) => commands::events::run(args),
        Commands::Reset(args) => commands::reset::run(args),
        Commands::Track(args) => commands::track::run(args, cli.dry_run),
        Commands::Visit(args) => commands::visit::run(args, cli.dry_run),
    }
}
