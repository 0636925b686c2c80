//! `keepsafe set`: add or update a secret in the store.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{authenticate, open_store, Cli};
use crate::errors::{KeepSafeError, Result};

/// Execute the `set` command.
pub fn execute(cli: &Cli, key: &str, value: Option<&str>) -> Result<()> {
    let mut store = open_store(cli)?;

    // Determine the secret value from one of three sources.
    let secret_value = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line; it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter value for {key}"))
            .interact()
            .map_err(|e| KeepSafeError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(v)
    };

    let (session, credential) = authenticate(cli, &store)?;

    let existed = store.list_names()?.iter().any(|n| n == key);
    store.add_secret(&session, key, &secret_value, &credential)?;

    let total = store.list_names()?.len();
    if existed {
        output::success(&format!("Secret '{key}' updated ({total} total)"));
    } else {
        output::success(&format!("Secret '{key}' added ({total} total)"));
    }

    Ok(())
}
