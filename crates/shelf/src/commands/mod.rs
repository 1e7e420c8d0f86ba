//! Command dispatch: one module per resource, plus config.

pub mod config_cmd;
mod movies;
mod products;
mod records;
mod util;

use shelf_core::{Fields, ListStore, Movie, Product, StoreConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a resource command to its handler.
pub async fn dispatch(
    cmd: Command,
    config: &StoreConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Movies(args) => {
            let store = open_store::<Movie>(config, global)?;
            movies::handle(&store, args, global)
                .await
                .map_err(|e| e.for_command("movies"))
        }
        Command::Products(args) => {
            let store = open_store::<Product>(config, global)?;
            products::handle(&store, args, global)
                .await
                .map_err(|e| e.for_command("products"))
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Open the store for `F`, honouring a `--resource` table override.
fn open_store<F: Fields>(
    config: &StoreConfig,
    global: &GlobalOpts,
) -> Result<ListStore<F>, CliError> {
    let mut config = config.clone();
    if let Some(ref table) = global.resource {
        config.tables.insert(F::RESOURCE.to_owned(), table.clone());
    }
    Ok(ListStore::open(&config)?)
}
