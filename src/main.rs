mod assistant;
mod chat;
mod config;
mod contacts;
mod layout;
mod logging;
mod notify;
mod storage;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use storage::KvStore;

#[derive(Parser, Debug)]
#[command(name = "wadesk")]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or clear the persisted section layout
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[arg(value_enum)]
    action: LayoutAction,
}

#[derive(Clone, Debug, ValueEnum)]
enum LayoutAction {
    /// Print the stored snapshot as JSON
    Dump,
    /// Remove the stored snapshot and all legacy keys
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();
    let config = config::load(cli.config.as_deref())?;

    if let Some(command) = cli.command {
        match command {
            Command::Layout(args) => {
                handle_layout(args, &config)?;
                return Ok(());
            }
        }
    }

    let store = KvStore::open(&config.storage_path)?;
    let mut app = ui::app::App::new(&config, store);
    app.run()?;

    Ok(())
}

fn handle_layout(args: LayoutArgs, config: &config::Config) -> Result<()> {
    let mut store = KvStore::open(&config.storage_path)?;
    match args.action {
        LayoutAction::Dump => {
            // Read the canonical key, falling back to the legacy one without
            // migrating anything (dump is read-only)
            let raw = store
                .get(layout::CANONICAL_KEY)
                .or_else(|| store.get(layout::LEGACY_KEY));
            match raw {
                Some(raw) => println!("{raw}"),
                None => println!("No stored section layout."),
            }
        }
        LayoutAction::Reset => {
            layout::reset(&mut store)?;
            println!("Section layout reset; next start uses the default order.");
        }
    }
    Ok(())
}
