//! Funnel milestone commands

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use leadtrack_core::events::DEFAULT_CTA_BUTTON;
use leadtrack_core::{DismissAction, FunnelTracker};

use crate::config::ConfigLoader;
use crate::state::LocalState;

/// Track arguments
#[derive(Args, Debug)]
pub struct TrackArgs {
    #[command(subcommand)]
    pub milestone: Milestone,
}

/// Funnel milestones on the current page
#[derive(Subcommand, Debug)]
pub enum Milestone {
    /// Hero call-to-action clicked
    CtaClick {
        #[arg(long, default_value = DEFAULT_CTA_BUTTON)]
        button: String,
    },
    /// First interaction with the lead form
    FormStart,
    /// Lead form submitted (only field presence is recorded)
    FormSubmit {
        #[arg(long)]
        has_name: bool,
        #[arg(long)]
        has_email: bool,
    },
    /// Thank-you state shown
    ThankYou,
    /// Blog post viewed
    BlogView,
    /// Call-to-action at the bottom of a blog post clicked
    BlogCta,
    /// Exit-intent popup shown
    PopupView,
    /// Exit-intent popup dismissed
    PopupDismiss {
        /// close_button or overlay_click
        #[arg(long, default_value = "close_button")]
        action: String,
    },
    /// Email captured through the exit-intent popup
    PopupConversion,
}

/// Run track command
pub fn run(args: TrackArgs, dry_run: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let state = LocalState::open()?;
    let target = state.event_target(dry_run)?;
    let session = state.resume(&config, &target)?;

    let sent = dispatch(session.tracker(), &args.milestone)?;
    if sent {
        println!("Tracked on {}", session.tracker().page().location);
    } else {
        println!("Not tracked (tracking disabled or sink unavailable)");
    }

    target.report()
}

fn dispatch(tracker: &FunnelTracker, milestone: &Milestone) -> Result<bool> {
    let sent = match milestone {
        Milestone::CtaClick { button } => tracker.cta_click(button),
        Milestone::FormStart => tracker.form_start(),
        Milestone::FormSubmit {
            has_name,
            has_email,
        } => tracker.form_submit(*has_name, *has_email),
        Milestone::ThankYou => tracker.thank_you_view(),
        Milestone::BlogView => tracker.blog_view(),
        Milestone::BlogCta => tracker.blog_cta_click(),
        Milestone::PopupView => tracker.popup_view(),
        Milestone::PopupDismiss { action } => {
            let Some(action) = DismissAction::parse(action) else {
                bail!("unknown dismiss action {:?} (expected close_button or overlay_click)", action);
            };
            tracker.popup_dismiss(action)
        }
        Milestone::PopupConversion => tracker.popup_conversion(),
    };
    Ok(sent)
}
