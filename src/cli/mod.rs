//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{KeepSafeError, Result};
use crate::store::{Credential, FileDocumentStore, SecretStore, Session};

/// Environment variable holding the master password (CI/CD).
pub const PASSWORD_ENV: &str = "KEEPSAFE_PASSWORD";

/// Environment variable holding the decryption key (CI/CD).
pub const DECRYPTION_KEY_ENV: &str = "KEEPSAFE_DECRYPTION_KEY";

/// KeepSafe CLI: password-protected local secret store.
#[derive(Parser)]
#[command(
    name = "keepsafe",
    about = "Password-protected local secret store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store file (default: .keepsafe, or `store_file` in .keepsafe.toml)
    #[arg(long, global = true)]
    pub file: Option<String>,

    /// Authenticate with the decryption key instead of the master password
    #[arg(long, global = true)]
    pub with_key: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new store (overwrites an existing one) and print its decryption key
    Init,

    /// Set a secret (add or update)
    Set {
        /// Secret name (e.g. api_key)
        key: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Get a secret's value
    Get {
        /// Secret name
        key: String,
    },

    /// List secret names
    List,

    /// Remove a secret
    Remove {
        /// Secret name
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Export all secrets with the master password
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Env)]
        format: OutputFormat,

        /// Output file (default: .env, or `export_file` in .keepsafe.toml)
        #[arg(short, long)]
        output: Option<String>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Print all secrets using only the decryption key (read-only)
    Access {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Env)]
        format: OutputFormat,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// How `export` and `access` render secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `KEY=value` line per secret, values verbatim
    Env,
    /// A JSON object of names to values
    Json,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password from `KEEPSAFE_PASSWORD` or an interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = non_empty_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| KeepSafeError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `KEEPSAFE_PASSWORD` for scripted/CI usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = non_empty_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Choose master password")
        .with_confirmation(
            "Confirm master password",
            "Passwords do not match, try again",
        )
        .interact()
        .map_err(|e| KeepSafeError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Get the decryption key from `KEEPSAFE_DECRYPTION_KEY` or a hidden prompt.
pub fn prompt_decryption_key() -> Result<Zeroizing<String>> {
    if let Some(key) = non_empty_env(DECRYPTION_KEY_ENV) {
        return Ok(Zeroizing::new(key.trim().to_string()));
    }

    let key = dialoguer::Password::new()
        .with_prompt("Enter decryption key")
        .interact()
        .map_err(|e| KeepSafeError::CommandFailed(format!("decryption key prompt: {e}")))?;
    Ok(Zeroizing::new(key.trim().to_string()))
}

fn non_empty_env(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(Zeroizing::new)
}

/// Resolve the store document path: `--file` if given, else the
/// `store_file` setting relative to the current directory.
pub fn store_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.file {
        Some(file) => Ok(cwd.join(file)),
        None => Ok(Settings::load(&cwd)?.store_path(&cwd)),
    }
}

/// Open the file-backed store named by the CLI arguments.
pub fn open_store(cli: &Cli) -> Result<SecretStore<FileDocumentStore>> {
    Ok(SecretStore::new(FileDocumentStore::new(store_path(cli)?)))
}

/// Unlock `store` with the credential selected on the command line.
///
/// Returns the session together with the credential, which secret
/// operations check again against the current document.
pub fn authenticate(
    cli: &Cli,
    store: &SecretStore<FileDocumentStore>,
) -> Result<(Session, Credential)> {
    if cli.with_key {
        let key = prompt_decryption_key()?;
        let session = store.unlock_with_key(&key)?;
        Ok((session, Credential::RawKey(key)))
    } else {
        let password = prompt_password()?;
        let session = store.unlock(&password)?;
        Ok((session, Credential::Password(password)))
    }
}
