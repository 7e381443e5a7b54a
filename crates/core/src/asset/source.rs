use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use tracing::trace;

use super::records::encode_record;
use crate::error::{CatalogError, Result};

/// Read-only store of named asset files.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Full contents of `file`, e.g. `classrooms.json`.
    async fn read(&self, file: &str) -> Result<Arc<[u8]>>;
}

/// Assets stored as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only bare file names resolve; anything that could leave `root` does not.
    fn resolve(&self, file: &str) -> Option<PathBuf> {
        let escapes = file.is_empty()
            || file.contains(['/', '\\'])
            || file == "."
            || file.contains("..");
        (!escapes).then(|| self.root.join(file))
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn read(&self, file: &str) -> Result<Arc<[u8]>> {
        let path = self
            .resolve(file)
            .ok_or_else(|| CatalogError::AssetNotFound(file.to_string()))?;
        trace!(path = %path.display(), "reading asset file");
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes.into()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CatalogError::AssetNotFound(file.to_string()))
            }
            Err(e) => Err(CatalogError::Io {
                asset: file.to_string(),
                source: e,
            }),
        }
    }
}

/// Assets held in memory. Used for fixtures and embedded catalogs.
#[derive(Debug, Default)]
pub struct InMemoryAssetSource {
    files: DashMap<String, Arc<[u8]>>,
}

impl InMemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, file: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(file.into(), bytes.into().into());
    }

    /// Store `value` as `<name>.json`.
    pub fn insert_json(&self, name: &str, value: &serde_json::Value) {
        self.insert(format!("{name}.json"), value.to_string());
    }

    /// Store `record` as `<name>.rec`.
    pub fn insert_record<R: Serialize>(&self, name: &str, record: &R) -> Result<()> {
        let bytes = encode_record(name, record)?;
        self.insert(format!("{name}.rec"), bytes);
        Ok(())
    }

    pub fn remove(&self, file: &str) -> bool {
        self.files.remove(file).is_some()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl AssetSource for InMemoryAssetSource {
    async fn read(&self, file: &str) -> Result<Arc<[u8]>> {
        self.files
            .get(file)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| CatalogError::AssetNotFound(file.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_source_rejects_escaping_names() {
        let source = FsAssetSource::new("/tmp/assets");
        assert!(source.resolve("../secret.json").is_none());
        assert!(source.resolve("nested/topic.json").is_none());
        assert!(source.resolve("").is_none());
        assert_eq!(
            source.resolve("topic.json"),
            Some(PathBuf::from("/tmp/assets/topic.json"))
        );
    }

    #[tokio::test]
    async fn test_in_memory_source_roundtrip() {
        let source = InMemoryAssetSource::new();
        source.insert("a.json", b"{}".to_vec());
        assert_eq!(&*source.read("a.json").await.unwrap(), b"{}");
        assert!(source.remove("a.json"));
        assert!(matches!(
            source.read("a.json").await,
            Err(CatalogError::AssetNotFound(name)) if name == "a.json"
        ));
    }
}
