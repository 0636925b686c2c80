//! `keepsafe export`: export secrets with the master password.
//!
//! Supported formats:
//! - `env` (default): one `KEY=value` line per secret, appended to the
//!   destination file.  Values are written verbatim, with no quoting.
//! - `json`: JSON object { "KEY": "value", ... }, replacing the file.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::{open_store, prompt_password, store_path, Cli, OutputFormat};
use crate::config::Settings;
use crate::errors::{KeepSafeError, Result};
use crate::store::SecretMap;

/// Execute the `export` command.
pub fn execute(
    cli: &Cli,
    format: OutputFormat,
    output_path: Option<&str>,
    to_stdout: bool,
) -> Result<()> {
    if cli.with_key {
        return Err(KeepSafeError::CommandFailed(
            "export requires the master password; use `keepsafe access` with the decryption key"
                .into(),
        ));
    }

    let store = open_store(cli)?;
    let password = prompt_password()?;

    // Stdout gets the raw output only, no success message.
    if to_stdout {
        match format {
            OutputFormat::Env => {
                store.export_all(&password, &mut io::stdout().lock())?;
            }
            OutputFormat::Json => {
                let session = store.unlock(&password)?;
                println!("{}", format_as_json(&store.decrypt_all(&session)?)?);
            }
        }
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let dest = match output_path {
        Some(p) => cwd.join(p),
        None => Settings::load(&cwd)?.export_path(&cwd),
    };

    // Refuse to export over the store document itself, however it is spelled.
    if same_location(&dest, &store_path(cli)?) {
        return Err(KeepSafeError::CommandFailed(
            "refusing to export over the store file".into(),
        ));
    }

    let count = match format {
        OutputFormat::Env => {
            let mut file = open_owner_only(&dest, WriteMode::Append)?;
            store.export_all(&password, &mut file)?
        }
        OutputFormat::Json => {
            let session = store.unlock(&password)?;
            let secrets = store.decrypt_all(&session)?;
            let json = format_as_json(&secrets)?;
            let mut file = open_owner_only(&dest, WriteMode::Truncate)?;
            writeln!(file, "{json}").map_err(|e| {
                KeepSafeError::CommandFailed(format!("failed to write export file: {e}"))
            })?;
            secrets.len()
        }
    };

    output::success(&format!("Exported {count} secrets to {}", dest.display()));
    Ok(())
}

#[derive(Clone, Copy)]
enum WriteMode {
    Append,
    Truncate,
}

/// Open `path` for writing, creating it owner-only if it does not exist.
fn open_owner_only(path: &Path, mode: WriteMode) -> Result<fs::File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Truncate => options.write(true).truncate(true),
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
        .open(path)
        .map_err(|e| KeepSafeError::CommandFailed(format!("failed to open export file: {e}")))
}

/// Whether `a` and `b` name the same file once `..`, `.` and symlinks in
/// their directories are resolved.
fn same_location(a: &Path, b: &Path) -> bool {
    resolve(a) == resolve(b)
}

/// Canonical form of a path whose final component may not exist yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(full) = path.canonicalize() {
        return full;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|dir| dir.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Format secrets as a JSON object.
pub(crate) fn format_as_json(secrets: &SecretMap) -> Result<String> {
    let plain: BTreeMap<&str, &str> = secrets
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    serde_json::to_string_pretty(&plain)
        .map_err(|e| KeepSafeError::SerializationError(format!("JSON export: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    #[test]
    fn format_json_produces_valid_json() {
        let mut secrets = SecretMap::new();
        secrets.insert("KEY".into(), Zeroizing::new("value".into()));

        let output = format_as_json(&secrets).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["KEY"], "value");
    }

    #[test]
    fn format_json_escapes_special_characters() {
        let mut secrets = SecretMap::new();
        secrets.insert("MULTI".into(), Zeroizing::new("a\"b\nc".into()));

        let output = format_as_json(&secrets).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["MULTI"], "a\"b\nc");
    }

    #[test]
    fn append_keeps_existing_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "EXISTING=1\n").unwrap();

        let mut file = open_owner_only(&path, WriteMode::Append).unwrap();
        writeln!(file, "NEW=2").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "EXISTING=1\nNEW=2\n");
    }

    #[test]
    fn truncate_replaces_existing_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "a much longer previous export\n").unwrap();

        let mut file = open_owner_only(&path, WriteMode::Truncate).unwrap();
        write!(file, "{{}}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[cfg(unix)]
    #[test]
    fn new_export_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        for (name, mode) in [("a.env", WriteMode::Append), ("a.json", WriteMode::Truncate)] {
            let path = dir.path().join(name);
            open_owner_only(&path, mode).unwrap();
            let bits = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(bits & 0o777, 0o600, "{name}");
        }
    }

    #[test]
    fn dotdot_path_resolves_to_store_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = dir.path().join(".keepsafe");
        fs::write(&store, "{}").unwrap();
        fs::create_dir(dir.path().join("x")).unwrap();

        assert!(same_location(&dir.path().join("x/../.keepsafe"), &store));
        assert!(same_location(&dir.path().join("./.keepsafe"), &store));
        assert!(!same_location(&dir.path().join("x/.keepsafe"), &store));
    }
}
