//! `keepsafe list`: show the names of all stored secrets.

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::Result;

/// Execute the `list` command.
///
/// Names are stored in clear, so no credential is needed.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    output::print_names(&store.list_names()?);
    Ok(())
}
