//! Page load with session startup

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::config::ConfigLoader;
use crate::state::LocalState;

/// Visit arguments
#[derive(Args, Debug)]
pub struct VisitArgs {
    /// Entry URL, including any utm_* query parameters
    pub url: String,

    /// Page title reported by page_view (defaults to [page].title)
    #[arg(long)]
    pub title: Option<String>,
}

/// Run visit command
pub fn run(args: VisitArgs, dry_run: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let state = LocalState::open()?;
    let target = state.event_target(dry_run)?;

    let title = args.title.unwrap_or_else(|| config.page.title.clone());
    let session = state.start(&config, &target, &args.url, &title)?;
    session.tracker().page_view();

    info!(session_id = %session.session_id(), url = %args.url, "Visited page");
    if !session.landing_params().is_empty() {
        println!(
            "Campaign landing: {}",
            serde_json::to_string(&session.landing_params().to_event_params())?
        );
    }
    println!(
        "Attribution:      {}",
        serde_json::to_string(&session.attribution().to_event_params())?
    );
    if !session.tracker().is_ready() {
        println!("Tracking disabled: no measurement id configured");
    }

    target.report()
}
