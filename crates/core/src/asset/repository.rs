use std::any::type_name;
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::source::AssetSource;
use crate::error::{CatalogError, Result};

pub const RECORD_EXTENSION: &str = "rec";
pub const DOCUMENT_EXTENSION: &str = "json";

/// Typed access to catalog assets with a read-through cache.
///
/// Only successful reads are cached; a missing or broken asset is read again
/// on the next request.
pub struct AssetRepository {
    source: Arc<dyn AssetSource>,
    bytes: DashMap<String, Arc<[u8]>>,
    documents: DashMap<String, Arc<Value>>,
}

impl AssetRepository {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            bytes: DashMap::new(),
            documents: DashMap::new(),
        }
    }

    /// Decode `<name>.rec` as `R`.
    pub async fn read_record<R: DeserializeOwned>(&self, name: &str) -> Result<R> {
        let file = format!("{name}.{RECORD_EXTENSION}");
        let bytes = self.read_bytes(&file).await?;
        rmp_serde::from_slice(&bytes).map_err(|e| {
            warn!(asset = %file, record = type_name::<R>(), "record decode failed: {}", e);
            self.bytes.remove(&file);
            CatalogError::SchemaMismatch {
                asset: file,
                reason: e.to_string(),
            }
        })
    }

    /// Parse `<name>.json`.
    pub async fn read_document(&self, name: &str) -> Result<Arc<Value>> {
        let file = format!("{name}.{DOCUMENT_EXTENSION}");
        if let Some(doc) = self.documents.get(&file) {
            trace!(asset = %file, "document cache hit");
            return Ok(Arc::clone(doc.value()));
        }

        let bytes = self.read_bytes(&file).await?;
        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(asset = %file, "document parse failed: {}", e);
            self.bytes.remove(&file);
            CatalogError::ParseError {
                asset: file.clone(),
                reason: e.to_string(),
            }
        })?;
        let value = Arc::new(value);
        self.documents.insert(file, Arc::clone(&value));
        Ok(value)
    }

    /// Drop every cached asset.
    pub fn clear_cache(&self) {
        self.bytes.clear();
        self.documents.clear();
    }

    pub fn cached_files(&self) -> usize {
        self.bytes.len()
    }

    async fn read_bytes(&self, file: &str) -> Result<Arc<[u8]>> {
        if let Some(bytes) = self.bytes.get(file) {
            trace!(asset = %file, "asset cache hit");
            return Ok(Arc::clone(bytes.value()));
        }
        let bytes = self.source.read(file).await?;
        debug!(asset = %file, len = bytes.len(), "asset loaded");
        self.bytes.insert(file.to_string(), Arc::clone(&bytes));
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::records::ClassroomIdList;
    use crate::asset::source::InMemoryAssetSource;

    fn repository() -> (Arc<InMemoryAssetSource>, AssetRepository) {
        let source = Arc::new(InMemoryAssetSource::new());
        let repo = AssetRepository::new(source.clone());
        (source, repo)
    }

    #[tokio::test]
    async fn test_record_decodes() {
        let (source, repo) = repository();
        let index = ClassroomIdList {
            classroom_ids: vec!["c0".into(), "c1".into()],
        };
        source.insert_record("classrooms", &index).unwrap();

        let decoded: ClassroomIdList = repo.read_record("classrooms").await.unwrap();
        assert_eq!(decoded, index);
    }

    #[tokio::test]
    async fn test_wrong_schema_is_schema_mismatch() {
        let (source, repo) = repository();
        source.insert("classrooms.rec", vec![0xc3]);
        let err = repo.read_record::<ClassroomIdList>("classrooms").await.unwrap_err();
        assert!(matches!(err, CatalogError::SchemaMismatch { .. }));
    }

    #[tokio::test]
    async fn test_parse_failure_is_not_cached() {
        let (source, repo) = repository();
        source.insert("topic.json", "{ not json");
        let err = repo.read_document("topic").await.unwrap_err();
        assert!(matches!(err, CatalogError::ParseError { .. }));

        assert_eq!(repo.cached_files(), 0);
        source.insert("topic.json", r#"{"id": "t0"}"#);
        let doc = repo.read_document("topic").await.unwrap();
        assert_eq!(doc["id"], "t0");
    }

    #[tokio::test]
    async fn test_missing_asset_is_retried() {
        let (source, repo) = repository();
        assert!(matches!(
            repo.read_document("topic").await,
            Err(CatalogError::AssetNotFound(_))
        ));
        source.insert("topic.json", r#"{"id": "t0"}"#);
        assert!(repo.read_document("topic").await.is_ok());
        assert_eq!(repo.cached_files(), 1);
    }
}
