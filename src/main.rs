mod app;
mod cli;
mod color;
mod config;
mod event;
mod logging;
mod store;
mod tui;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use config::Config;
use store::ColorHistoryStore;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let config_path = cli_opts
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let config = Config::load(&config_path)?;
    // Commands still run without a log file.
    let _log_guard = match logging::init(&config.log_path(), &config.log_level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("swatchr: logging disabled: {err:#}");
            None
        }
    };

    let history_path = cli_opts
        .history
        .clone()
        .unwrap_or_else(|| config.history_path());
    let mut store = ColorHistoryStore::new(history_path);

    if let Some(command) = cli_opts.command {
        return cli::run(command, &mut store);
    }

    info!(path = %store.path().display(), "starting terminal ui");
    let mut app = app::App::new(store, config.confirm_clear);
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    let restored = tui::restore();
    shutdown(&mut app, restored)?;
    result
}

/// Save on the way out, even when the terminal could not be restored.
///
/// The save is best effort; the next launch loads whatever made it to disk.
fn shutdown(app: &mut app::App, restored: Result<()>) -> Result<()> {
    if let Err(err) = app.store.on_deactivate() {
        warn!(error = %err, "history save on exit failed");
        eprintln!("swatchr: {err}");
    }
    restored
}
