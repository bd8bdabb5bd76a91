use chrono::Local;
use clap::Subcommand;
use focusbuddy_core::NoteLog;

use crate::context::Context;

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note to the current session
    Add {
        /// Note text
        text: String,
    },
    /// List notes, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a note by the index shown in `list`
    Delete {
        index: usize,
    },
}

pub async fn run(ctx: &Context, action: NoteAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NoteAction::Add { text } => {
            let (fg, _) = ctx.foreground(false).await?;
            let note = fg.add_note(&text).await?;
            println!("Note added to session #{}", note.session_number);
        }
        NoteAction::List { json } => {
            let notes = NoteLog::new(ctx.store.clone()).newest_first().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else if notes.is_empty() {
                println!("No notes.");
            } else {
                for entry in notes {
                    let when = entry.note.timestamp.with_timezone(&Local);
                    println!(
                        "{:>3} Session #{} - {}  {}",
                        entry.index,
                        entry.note.session_number,
                        when.format("%Y-%m-%d %H:%M"),
                        entry.note.text
                    );
                }
            }
        }
        NoteAction::Delete { index } => {
            let note = NoteLog::new(ctx.store.clone()).delete(index).await?;
            println!("Deleted: {}", note.text);
        }
    }
    Ok(())
}
