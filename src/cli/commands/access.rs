//! `keepsafe access`: read-only dump of every secret using only the
//! decryption key.  The master password is never asked for.

use std::io;

use crate::cli::commands::export::format_as_json;
use crate::cli::{open_store, prompt_decryption_key, Cli, OutputFormat};
use crate::errors::Result;
use crate::store::write_env_lines;

/// Execute the `access` command.
pub fn execute(cli: &Cli, format: OutputFormat) -> Result<()> {
    let store = open_store(cli)?;
    let key = prompt_decryption_key()?;
    let secrets = store.access_read_only(&key)?;

    match format {
        OutputFormat::Env => {
            write_env_lines(&secrets, &mut io::stdout().lock())?;
        }
        OutputFormat::Json => println!("{}", format_as_json(&secrets)?),
    }

    Ok(())
}
