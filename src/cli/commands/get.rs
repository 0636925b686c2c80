//! `keepsafe get`: retrieve and print a single secret's value.

use crate::cli::{authenticate, open_store, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    let store = open_store(cli)?;
    let (session, credential) = authenticate(cli, &store)?;

    // Decrypt and print the secret value to stdout.
    let value = store.get_secret(&session, key, &credential)?;
    println!("{}", value.as_str());

    Ok(())
}
