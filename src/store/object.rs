use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Location metadata for an object written to storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredObject {
    pub key: String,
    pub location: String,
    pub size: usize,
}

#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<StoredObject>;
}

/// Random unique storage key that keeps the original file extension.
///
/// Only plain ASCII alphanumeric extensions are kept, so a client file name
/// can never put a path separator or dot segment into the key.
pub fn generate_object_key(original_name: Option<&str>) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{token}.{ext}"),
        None => token,
    }
}

/// Object storage rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<StoredObject> {
        let has_separator = key.contains(|c: char| c == '/' || c == '\\');
        if key.is_empty() || has_separator || key.starts_with('.') {
            anyhow::bail!("Invalid object key '{}'", key);
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| {
                format!("Failed to create upload directory {}", self.root.display())
            })?;

        let path = self.root.join(key);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write object {}", path.display()))?;

        Ok(StoredObject {
            key: key.to_string(),
            location: path.display().to_string(),
            size: bytes.len(),
        })
    }
}
