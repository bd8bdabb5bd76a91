use clap::Subcommand;
use focusbuddy_core::{Request, SiteBlocker};

use crate::context::Context;

#[derive(Subcommand)]
pub enum SiteAction {
    /// Decide whether a navigation would be blocked right now
    Check {
        /// Target URL
        url: String,
        /// Evaluate as if a focus session were running
        #[arg(long)]
        active: bool,
    },
    /// Print the blocklist in effect
    List,
}

pub async fn run(ctx: &Context, action: SiteAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SiteAction::Check { url, active } => {
            // Restoring the foreground re-announces a running session to
            // the background, so the verdict reflects the persisted timer.
            let (fg, _) = ctx.foreground(false).await?;
            let bg = fg.background();
            if active {
                bg.send(Request::StartSession).await?;
            }
            let verdict = bg.navigate(url).await?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        SiteAction::List => {
            let blocker = SiteBlocker::load(&*ctx.store).await?;
            for site in blocker.sites() {
                println!("{site}");
            }
        }
    }
    Ok(())
}
