use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{KeepSafeError, Result};

/// Project-level configuration, loaded from `.keepsafe.toml`.
///
/// Every field has a default so KeepSafe works without any config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Store document path, relative to the project root.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Default destination for `export`, relative to the project root.
    #[serde(default = "default_export_file")]
    pub export_file: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_file() -> String {
    ".keepsafe".to_string()
}

fn default_export_file() -> String {
    ".env".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            export_file: default_export_file(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".keepsafe.toml";

    /// Load settings from `<project_dir>/.keepsafe.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            KeepSafeError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Full path to the store document.
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_file)
    }

    /// Full path to the default export file.
    pub fn export_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.export_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.store_file, ".keepsafe");
        assert_eq!(s.export_file, ".env");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.store_file, ".keepsafe");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
store_file = "secrets/app.keepsafe"
export_file = "app.env"
"#;
        fs::write(tmp.path().join(".keepsafe.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.store_file, "secrets/app.keepsafe");
        assert_eq!(settings.export_file, "app.env");
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".keepsafe.toml"), "export_file = \"prod.env\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.export_file, "prod.env");
        assert_eq!(settings.store_file, ".keepsafe");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".keepsafe.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(KeepSafeError::ConfigError(_))));
    }

    #[test]
    fn paths_are_joined_to_project_dir() {
        let s = Settings::default();
        let project = Path::new("/home/user/myproject");
        assert_eq!(
            s.store_path(project),
            PathBuf::from("/home/user/myproject/.keepsafe")
        );
        assert_eq!(
            s.export_path(project),
            PathBuf::from("/home/user/myproject/.env")
        );
    }
}
