use crate::errors::StoreError;
use crate::models::RemoteFile;
use async_trait::async_trait;
use axum::http::StatusCode;
use std::sync::Mutex;

/// A single versioned file in a remote repository.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Human readable location, used in error messages.
    fn path(&self) -> &str;

    async fn read(&self) -> Result<RemoteFile, StoreError>;

    /// Replaces the file. `sha` must be the token of the last read, otherwise
    /// the provider rejects the write.
    async fn write(&self, content: &str, sha: &str, message: &str) -> Result<(), StoreError>;
}

/// In-process store with the same sha check as the remote provider.
#[derive(Debug)]
pub struct MemoryStore {
    path: String,
    inner: Mutex<MemoryFile>,
}

#[derive(Debug)]
struct MemoryFile {
    content: String,
    version: u64,
    reads: usize,
    writes: Vec<String>,
}

impl MemoryStore {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(MemoryFile {
                content: content.into(),
                version: 1,
                reads: 0,
                writes: Vec::new(),
            }),
        }
    }

    pub fn content(&self) -> String {
        self.lock().content.clone()
    }

    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Commit messages of accepted writes, oldest first.
    pub fn commits(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    /// Simulates another writer landing a commit between our read and write.
    pub fn bump(&self, content: impl Into<String>) {
        let mut file = self.lock();
        file.content = content.into();
        file.version += 1;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryFile> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn path(&self) -> &str {
        &self.path
    }

    async fn read(&self) -> Result<RemoteFile, StoreError> {
        let mut file = self.lock();
        file.reads += 1;
        Ok(RemoteFile {
            content: file.content.clone(),
            sha: format!("v{}", file.version),
        })
    }

    async fn write(&self, content: &str, sha: &str, message: &str) -> Result<(), StoreError> {
        let mut file = self.lock();
        if sha != format!("v{}", file.version) {
            return Err(StoreError::Status {
                status: StatusCode::CONFLICT,
                body: format!("{} does not match v{}", sha, file.version),
            });
        }
        file.content = content.to_string();
        file.version += 1;
        file.writes.push(message.to_string());
        Ok(())
    }
}
