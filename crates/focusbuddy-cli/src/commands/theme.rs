use clap::Subcommand;
use focusbuddy_core::preferences;

use crate::context::Context;

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Switch between light and dark
    Toggle,
    /// Print the current theme
    Show,
}

fn name(dark: bool) -> &'static str {
    if dark {
        "dark"
    } else {
        "light"
    }
}

pub async fn run(ctx: &Context, action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let dark = match action {
        ThemeAction::Toggle => preferences::toggle_dark_mode(&*ctx.store).await?,
        ThemeAction::Show => preferences::dark_mode(&*ctx.store).await?.unwrap_or(false),
    };
    println!("{}", name(dark));
    Ok(())
}
