use clap::Subcommand;
use focusbuddy_core::settings::SETTING_KEYS;
use focusbuddy_core::Settings;

use crate::context::Context;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting (durations in minutes)
    Get {
        /// Setting key (e.g. "focusDuration", "blockedSites")
        key: String,
    },
    /// Set a single setting
    Set {
        /// Setting key
        key: String,
        /// New value (minutes, count, or comma-separated sites)
        value: String,
    },
    /// Save several settings at once; omitted fields keep their current value
    Save {
        /// Focus length in minutes
        #[arg(long)]
        focus: Option<String>,
        /// Short break in minutes
        #[arg(long)]
        short_break: Option<String>,
        /// Long break in minutes
        #[arg(long)]
        long_break: Option<String>,
        /// Focus sessions before a long break
        #[arg(long)]
        sessions: Option<String>,
        /// Comma-separated blocklist
        #[arg(long)]
        sites: Option<String>,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

fn print_settings(settings: &Settings) {
    for key in SETTING_KEYS {
        if let Some(value) = settings.display_value(key) {
            println!("{key} = {value}");
        }
    }
}

pub async fn run(ctx: &Context, action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut fg, _) = ctx.foreground(false).await?;

    match action {
        SettingsAction::Get { key } => match fg.settings().display_value(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown setting: {key}").into()),
        },
        SettingsAction::Set { key, value } => {
            let mut settings = fg.settings().clone();
            settings.apply(&key, &value)?;
            fg.save_settings(settings).await?;
            println!("ok");
        }
        SettingsAction::Save {
            focus,
            short_break,
            long_break,
            sessions,
            sites,
        } => {
            let mut settings = fg.settings().clone();
            let fields = [
                ("focusDuration", focus),
                ("shortBreak", short_break),
                ("longBreak", long_break),
                ("sessionsBeforeLongBreak", sessions),
                ("blockedSites", sites),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    settings.apply(key, &value)?;
                }
            }
            fg.save_settings(settings).await?;
            print_settings(fg.settings());
        }
        SettingsAction::List => print_settings(fg.settings()),
        SettingsAction::Reset => {
            fg.save_settings(Settings::default()).await?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
