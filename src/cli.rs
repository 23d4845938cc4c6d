/// CLI argument parsing and command handling.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::color::{Color, label_name};
use crate::store::ColorHistoryStore;

#[derive(Parser)]
#[command(
    name = "swatchr",
    version,
    about = "Swatchr - A terminal random color generator with history"
)]
pub struct Cli {
    /// Config file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// History file, overriding the config.
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate new random colors and add them to the history.
    Generate {
        #[arg(short = 'n', long = "count", default_value_t = 1)]
        count: usize,
    },
    /// Print the history, oldest first.
    List,
    /// Remove one history entry by index.
    Delete { index: usize },
    /// Remove every history entry.
    Clear,
    /// Print the readable label color (black or white) for a color.
    Label { color: String },
    /// Print the resolved history file path.
    Path,
}

/// Execute a one-shot CLI command against the store.
pub fn run(command: Command, store: &mut ColorHistoryStore) -> Result<()> {
    match command {
        Command::Generate { count } => with_history(store, |store| {
            handle_generate(count, store);
            Ok(())
        }),
        Command::List => {
            store.on_activate()?;
            handle_list(store);
            Ok(())
        }
        Command::Delete { index } => with_history(store, |store| handle_delete(index, store)),
        Command::Clear => with_history(store, |store| {
            let count = store.len();
            store.clear_all();
            println!("Cleared {count} colors.");
            Ok(())
        }),
        Command::Label { color } => handle_label(&color),
        Command::Path => {
            println!("{}", store.path().display());
            Ok(())
        }
    }
}

/// Load, mutate, then write the history back.
fn with_history(
    store: &mut ColorHistoryStore,
    op: impl FnOnce(&mut ColorHistoryStore) -> Result<()>,
) -> Result<()> {
    store.on_activate()?;
    op(store)?;
    store.on_deactivate()?;
    Ok(())
}

fn handle_generate(count: usize, store: &mut ColorHistoryStore) {
    for _ in 0..count {
        let color = store.generate();
        println!("{color}");
    }
}

fn handle_list(store: &ColorHistoryStore) {
    if store.is_empty() {
        println!("History is empty.");
        return;
    }
    for (index, color) in store.history().iter().enumerate() {
        println!(
            "{index:>4}  {}  {}",
            ColorHistoryStore::to_display_string(*color),
            label_name(ColorHistoryStore::contrast_label(*color))
        );
    }
}

fn handle_delete(index: usize, store: &mut ColorHistoryStore) -> Result<()> {
    let color = store
        .delete(index)
        .with_context(|| format!("cannot delete entry {index}"))?;
    println!("Deleted {color}.");
    Ok(())
}

fn handle_label(value: &str) -> Result<()> {
    let color: Color = value
        .parse()
        .with_context(|| format!("'{value}' is not a color"))?;
    println!(
        "{}",
        label_name(ColorHistoryStore::contrast_label(color))
    );
    Ok(())
}
