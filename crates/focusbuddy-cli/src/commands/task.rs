use clap::Subcommand;
use focusbuddy_core::{Task, TaskList};

use crate::context::Context;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },
    /// List tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task's completed flag
    Toggle {
        /// Position in the list
        index: usize,
    },
    /// Delete a task
    Delete {
        /// Position in the list
        index: usize,
    },
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for (i, task) in tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        println!("{i:>3} [{mark}] {}", task.text);
    }
}

pub async fn run(ctx: &Context, action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let list = TaskList::new(ctx.store.clone());

    match action {
        TaskAction::Add { text } => print_tasks(&list.add(&text).await?),
        TaskAction::List { json } => {
            let tasks = list.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print_tasks(&tasks);
            }
        }
        TaskAction::Toggle { index } => print_tasks(&list.toggle(index).await?),
        TaskAction::Delete { index } => print_tasks(&list.delete(index).await?),
    }
    Ok(())
}
