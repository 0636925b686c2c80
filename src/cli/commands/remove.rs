//! `keepsafe remove`: remove a secret from the store.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{authenticate, open_store, Cli};
use crate::errors::{KeepSafeError, Result};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, key: &str, force: bool) -> Result<()> {
    let mut store = open_store(cli)?;

    // Unless --force is set, ask for confirmation before removing.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove secret '{key}'?"))
            .default(false)
            .interact()
            .map_err(|e| KeepSafeError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let (session, credential) = authenticate(cli, &store)?;
    store.remove_secret(&session, key, &credential)?;

    output::success(&format!("Removed secret '{key}'"));
    Ok(())
}
