use clap::{Parser, Subcommand};
use focusbuddy_core::preferences;
use focusbuddy_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use context::Context;

#[derive(Parser)]
#[command(name = "focusbuddy-cli", version, about = "FocusBuddy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Timer settings and blocklist
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Task list
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Session notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Streak, badges and weekly productivity
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Light/dark theme preference
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Site blocking
    Site {
        #[command(subcommand)]
        action: commands::site::SiteAction,
    },
    /// Print a motivational quote
    Quote,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("FOCUSBUDDY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(command: Commands, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let open = move || Context::open(config);
    match command {
        Commands::Timer { action } => commands::timer::run(&open()?, action).await,
        Commands::Settings { action } => commands::settings::run(&open()?, action).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Task { action } => commands::task::run(&open()?, action).await,
        Commands::Note { action } => commands::note::run(&open()?, action).await,
        Commands::Stats { action } => commands::stats::run(&open()?, action).await,
        Commands::Theme { action } => commands::theme::run(&open()?, action).await,
        Commands::Site { action } => commands::site::run(&open()?, action).await,
        Commands::Quote => {
            println!("{}", preferences::random_quote());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default();
    init_tracing(&config.logging.filter);

    if let Err(e) = dispatch(cli.command, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
