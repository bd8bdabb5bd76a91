use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use focusbuddy_core::background::IdleDetector;
use focusbuddy_core::{Event, Foreground};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::Context;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer until Ctrl-C. Enter toggles pause, `r` resets, `q` quits
    Run {
        /// Start counting down immediately
        #[arg(long)]
        start: bool,
        /// Start the next phase automatically when one ends
        #[arg(long)]
        continuous: bool,
    },
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Stop and refill the current phase
    Reset,
    /// Print current timer state as JSON
    Status,
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn is_phase_end(event: &Event) -> bool {
    matches!(event, Event::FocusCompleted { .. } | Event::BreakCompleted { .. })
}

pub async fn run(ctx: &Context, action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    if let TimerAction::Run { start, continuous } = action {
        return run_live(ctx, start, continuous).await;
    }

    let (mut fg, restored) = ctx.foreground(false).await?;
    let mut events: Vec<Event> = restored
        .into_iter()
        .filter(|e| !matches!(e, Event::Restored { .. }))
        .collect();

    match action {
        TimerAction::Start => events.extend(fg.start().await?),
        TimerAction::Pause => events.extend(fg.pause().await?),
        TimerAction::Reset => events.extend(fg.reset().await?),
        TimerAction::Status | TimerAction::Run { .. } => {}
    }

    let output = serde_json::json!({
        "timer": fg.view(),
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_live(ctx: &Context, start: bool, continuous: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut fg, restored) = ctx.foreground(true).await?;
    print_events(&restored)?;
    if start {
        print_events(&fg.start().await?)?;
    }

    let mut idle = IdleDetector::new(ctx.config.policy.idle_threshold_secs, Utc::now());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let events = fg.tick().await?;
                print_events(&events)?;
                if continuous && events.iter().any(is_phase_end) {
                    print_events(&fg.start().await?)?;
                }
                if let Some(state) = idle.poll(Utc::now()) {
                    fg.background().idle_state_changed(state).await?;
                }
                render(&fg);
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                if let Some(state) = idle.record_activity(Utc::now()) {
                    fg.background().idle_state_changed(state).await?;
                }
                match line.trim() {
                    "" | "p" => print_events(&fg.toggle().await?)?,
                    "r" => print_events(&fg.reset().await?)?,
                    "q" => break,
                    other => tracing::debug!(input = other, "ignoring input"),
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    eprintln!();
    tracing::info!(remaining = fg.state().remaining_seconds, "timer loop stopped");
    Ok(())
}

fn render(fg: &Foreground) {
    let view = fg.view();
    let marker = if fg.is_running() { ">" } else { "||" };
    eprint!("\r{marker} {}  {}   ", view.status, view.display);
}
