//! Start a new browser session

use anyhow::Result;
use clap::Args;

use crate::state::LocalState;

/// Reset arguments
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Also delete the event log
    #[arg(long)]
    pub events: bool,
}

/// Run reset command
pub fn run(args: ResetArgs) -> Result<()> {
    let state = LocalState::open()?;
    state.reset()?;
    println!("Session storage cleared");

    if args.events && state.event_log.exists() {
        std::fs::remove_file(&state.event_log)?;
        println!("Event log removed: {}", state.event_log.display());
    }
    Ok(())
}
