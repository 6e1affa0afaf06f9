//! Contact store access.
//!
//! The [`ContactStore`] trait is the only thing the HTTP layer knows about
//! persistence. Two backends implement it:
//!
//! - [`MemoryStore`]: an insertion-ordered collection held in process
//! - [`FileStore`]: the same collection persisted as a JSON document file
//!
//! Every backend parses ids itself (so a malformed id is always a
//! [`StoreError::Cast`]) and runs schema validation on create and update.

pub mod contact;
pub mod error;
pub mod file;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

pub use contact::{Contact, ContactDraft, ContactId, ContactPatch};
pub use error::{ErrorKind, Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage backend for contacts.
///
/// Implementations must be thread-safe (`Send + Sync`); concurrent updates to
/// the same id are last-write-wins.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts in store-native order.
    async fn list(&self) -> Result<Vec<Contact>>;

    /// Returns `Ok(None)` if no contact has this id.
    async fn get(&self, id: &str) -> Result<Option<Contact>>;

    /// Validates and stores a new contact, returning it with its assigned id.
    async fn create(&self, draft: ContactDraft) -> Result<Contact>;

    /// Validates and applies `patch`, returning the updated contact, or
    /// `Ok(None)` if no contact has this id.
    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Option<Contact>>;

    /// Removes the contact if present. Returns whether it existed; deleting a
    /// missing id is not an error.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Number of stored contacts.
    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}

/// Where a store lives, parsed from a connection string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Parses `memory:`, `file:<path>`, or a bare filesystem path.
    ///
    /// Any other `scheme:` prefix is rejected so a mistyped URL does not
    /// silently become a relative file name.
    pub fn parse(url: &str) -> std::result::Result<Self, String> {
        let url = url.trim();
        if url.is_empty() || url == "memory:" || url == "memory://" {
            return Ok(Self::Memory);
        }
        if let Some(path) = url.strip_prefix("file://").or_else(|| url.strip_prefix("file:")) {
            if path.is_empty() {
                return Err("file store needs a path".to_owned());
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = url.split_once("://") {
            return Err(format!("unsupported store scheme `{scheme}`"));
        }
        Ok(Self::File(PathBuf::from(url)))
    }

    /// Opens the store at this location.
    pub async fn open(&self) -> Result<Arc<dyn ContactStore>> {
        Ok(match self {
            Self::Memory => Arc::new(MemoryStore::new()),
            Self::File(path) => Arc::new(FileStore::open(path).await?),
        })
    }
}
