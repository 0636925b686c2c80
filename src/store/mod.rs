//! Store module: the encrypted secret document and its operations.
//!
//! This module provides:
//! - The persisted `Document` shape (`document`)
//! - `DocumentStore` backends for files and memory (`backend`)
//! - `Credential` and the checks that resolve it to a FileKey (`credential`)
//! - The unlocked `Session` capability (`session`)
//! - The `SecretStore` orchestrator (`secret_store`)

pub mod backend;
pub mod credential;
pub mod document;
pub mod secret_store;
pub mod session;

// Re-export the most commonly used items.
pub use backend::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
pub use credential::Credential;
pub use document::Document;
pub use secret_store::{write_env_lines, SecretMap, SecretStore};
pub use session::Session;
