//! SiteGenie - construction-only chat assistant
//!
//! Interactive terminal chat backed by a hosted model, with the conversation
//! saved to a local SQLite file.

use anyhow::Result;
use clap::Parser;
use sitegenie::cli::{Cli, Commands};
use sitegenie::display::Ui;
use sitegenie::{commands, logging, repl};
use sitegenie_common::{MessageStore, SiteGenieConfig};
use tracing::{debug, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = SiteGenieConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.storage.database_path = path;
    }
    if let Some(model) = cli.model {
        config.model.name = model;
    }
    debug!(
        "Using model {} and database {}",
        config.model.name,
        config.storage.database_path.display()
    );

    let ui = Ui::new(config.output.color);
    let store = MessageStore::new(&config.storage.database_path);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            // Chat keeps working in memory if the store can't be provisioned
            if let Err(e) = store.initialize() {
                warn!("{}", e);
            }
            if config.model.api_key.is_none() {
                ui.warning("GEMINI_API_KEY is not set; only canned replies will work.");
            }
            let gateway = commands::build_gateway(&config)?;
            repl::start_repl(&store, &gateway, &ui)
        }
        Commands::Ask { query } => {
            if let Err(e) = store.initialize() {
                warn!("{}", e);
            }
            let gateway = commands::build_gateway(&config)?;
            commands::ask(&store, &gateway, &ui, &query)
        }
        Commands::History { json } => {
            store.initialize()?;
            commands::history(&store, &ui, json)
        }
        Commands::Clear => {
            store.initialize()?;
            commands::clear(&store, &ui)
        }
    }
}
