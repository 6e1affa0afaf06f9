//! In-memory contact store for tests and ephemeral use.
//!
//! [`MemoryStore`] keeps every contact in a [`Collection`] behind a `RwLock`.
//! Data is lost when the store is dropped.

use std::sync::RwLock;

use async_trait::async_trait;

use super::contact::{Contact, ContactDraft, ContactId, ContactPatch};
use super::error::{Result, StoreError};
use super::ContactStore;

/// An insertion-ordered collection of contacts.
///
/// The synchronous core shared by every backend: id parsing, validation and
/// the actual reads and writes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Collection {
    contacts: Vec<Contact>,
}

impl Collection {
    pub(crate) fn from_contacts(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    pub(crate) fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub(crate) fn get(&self, id: &str) -> Result<Option<Contact>> {
        let id: ContactId = id.parse()?;
        Ok(self.contacts.iter().find(|c| c.id == id).cloned())
    }

    pub(crate) fn create(&mut self, draft: ContactDraft) -> Result<Contact> {
        draft.validate()?;
        let contact = draft.into_contact(ContactId::generate());
        self.contacts.push(contact.clone());
        Ok(contact)
    }

    pub(crate) fn update(&mut self, id: &str, patch: ContactPatch) -> Result<Option<Contact>> {
        let id: ContactId = id.parse()?;
        patch.validate()?;
        let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        contact.apply(patch);
        Ok(Some(contact.clone()))
    }

    pub(crate) fn delete(&mut self, id: &str) -> Result<bool> {
        let id: ContactId = id.parse()?;
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        Ok(self.contacts.len() != before)
    }
}

/// An in-memory implementation of [`ContactStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Collection) -> Result<T>) -> Result<T> {
        let collection = self.collection.read().map_err(|e| {
            StoreError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        f(&collection)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Collection) -> Result<T>) -> Result<T> {
        let mut collection = self.collection.write().map_err(|e| {
            StoreError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        f(&mut collection)
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Contact>> {
        self.read(|c| Ok(c.contacts().to_vec()))
    }

    async fn get(&self, id: &str) -> Result<Option<Contact>> {
        self.read(|c| c.get(id))
    }

    async fn create(&self, draft: ContactDraft) -> Result<Contact> {
        self.write(|c| c.create(draft))
    }

    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Option<Contact>> {
        self.write(|c| c.update(id, patch))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.write(|c| c.delete(id))
    }

    async fn count(&self) -> Result<usize> {
        self.read(|c| Ok(c.contacts().len()))
    }
}
