//! Command implementations for the covid_recon CLI
//!
//! Each command lives in its own module:
//! - `import`: download, reconcile and persist
//! - `places`: list the places in a saved snapshot

pub mod import;
pub mod places;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Dispatch to the subcommand named in `args`
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Import(import_args)) => import::run_import(import_args).await.map(|_| ()),
        Some(Commands::Places(places_args)) => places::run_places(places_args),
        None => Err(Error::configuration("No command given")),
    }
}
