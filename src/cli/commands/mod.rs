//! One module per `keepsafe` subcommand.

pub mod access;
pub mod completions;
pub mod export;
pub mod get;
pub mod init;
pub mod list;
pub mod remove;
pub mod set;
