//! File-backed contact store.
//!
//! The whole collection is one JSON array on disk. It is read once at open;
//! every mutation is applied to a copy, written to `<file>.tmp`, fsynced and
//! renamed over the original, and only then becomes visible to readers. A
//! failed write leaves both the file and the in-memory collection unchanged
//! and removes the temporary file. Mutations that change nothing skip the
//! write.
//!
//! Write and commit run on their own task, so a caller that goes away
//! mid-write cannot leave the file ahead of memory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::contact::{Contact, ContactDraft, ContactPatch};
use super::error::{Result, StoreError};
use super::memory::Collection;
use super::ContactStore;

/// A [`ContactStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    collection: Arc<Mutex<Collection>>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contacts: Vec<Contact> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), contacts = contacts.len(), "opened contact file");
        Ok(Self { path, collection: Arc::new(Mutex::new(Collection::from_contacts(contacts))) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `f` to a copy of the collection and commits it once persisted.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Collection) -> Result<T>) -> Result<T> {
        let mut current = Arc::clone(&self.collection).lock_owned().await;
        let mut next = current.clone();
        let out = f(&mut next)?;
        if next == *current {
            return Ok(out);
        }

        let path = self.path.clone();
        let commit = tokio::spawn(async move {
            write_atomic(&path, next.contacts()).await?;
            *current = next;
            Ok::<_, StoreError>(())
        });
        commit
            .await
            .map_err(|e| StoreError::Unavailable(format!("contact file writer failed: {e}")))??;
        Ok(out)
    }
}

async fn write_atomic(path: &Path, contacts: &[Contact]) -> Result<()> {
    let payload = serde_json::to_vec_pretty(contacts)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let written = async {
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(&payload).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
            warn!(path = %tmp_path.display(), "failed to remove temporary file: {cleanup}");
        }
        return Err(e.into());
    }

    debug!(path = %path.display(), contacts = contacts.len(), "wrote contact file");
    Ok(())
}

#[async_trait]
impl ContactStore for FileStore {
    async fn list(&self) -> Result<Vec<Contact>> {
        Ok(self.collection.lock().await.contacts().to_vec())
    }

    async fn get(&self, id: &str) -> Result<Option<Contact>> {
        self.collection.lock().await.get(id)
    }

    async fn create(&self, draft: ContactDraft) -> Result<Contact> {
        self.mutate(|c| c.create(draft)).await
    }

    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Option<Contact>> {
        self.mutate(|c| c.update(id, patch)).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.mutate(|c| c.delete(id)).await
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.collection.lock().await.contacts().len())
    }
}
