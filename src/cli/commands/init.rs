//! `keepsafe init`: create a new store and print its decryption key.

use crate::cli::output;
use crate::cli::{prompt_new_password, store_path, Cli};
use crate::errors::Result;
use crate::store::{FileDocumentStore, SecretStore};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = store_path(cli)?;
    let mut store = SecretStore::new(FileDocumentStore::new(&path));

    // Re-initializing is allowed, but everything in the old store is lost.
    if store.is_initialized() {
        output::warning(&format!(
            "{} already exists and will be overwritten.",
            path.display()
        ));
    }

    let password = prompt_new_password()?;
    let (_session, decryption_key) = store.initialize(&password)?;

    output::success(&format!("Secret store initialized at {}", path.display()));
    output::info("Decryption key (shown only once):");
    println!("{}", decryption_key.as_str());

    output::tip("Anyone holding the decryption key can read and write every secret.");
    output::tip("Run `keepsafe set <KEY>` to add a secret.");

    Ok(())
}
