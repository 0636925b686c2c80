//! Project configuration (`.keepsafe.toml`).

pub mod settings;

pub use settings::Settings;
