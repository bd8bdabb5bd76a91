use clap::Subcommand;
use focusbuddy_core::timer::{Clock, SystemClock};
use focusbuddy_core::{productivity, Ledger};

use crate::context::Context;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current and longest daily streak
    Streak,
    /// Level and achievements
    Badges,
    /// Focus sessions over the last seven days
    Productivity {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(ctx: &Context, action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = Ledger::new(ctx.store.clone(), ctx.notifier.clone());

    match action {
        StatsAction::Streak => {
            let streak = ledger.streak().await?;
            println!("{}", serde_json::to_string_pretty(&streak)?);
        }
        StatsAction::Badges => {
            let badges = ledger.badges().await?;
            println!("{}", serde_json::to_string_pretty(&badges)?);
        }
        StatsAction::Productivity { json } => {
            let week = productivity::weekly(&*ctx.store, SystemClock.today()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                for day in &week {
                    let bar = "#".repeat(day.sessions as usize);
                    println!("{} {:>3} min  {bar}", day.label(), day.minutes);
                }
            }
        }
    }
    Ok(())
}
