use std::sync::Arc;

use async_trait::async_trait;
use syllabus_api::{
    ClassroomId, StoryId, SubtitledText, TopicId, TopicPlayAvailability, TopicThumbnail,
    TranslationOverlay,
};

use super::document::DocumentBackend;
use super::record::RecordBackend;
use crate::asset::AssetRepository;
use crate::config::BackendMode;
use crate::error::Result;

/// Name of the index asset listing every classroom.
pub const CLASSROOM_INDEX: &str = "classrooms";

/// A classroom as read from either backend, before localization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomEntry {
    pub classroom_id: ClassroomId,
    pub title: SubtitledText,
    pub topic_ids: Vec<TopicId>,
    pub translations: TranslationOverlay,
}

/// A topic as read from either backend, before localization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub topic_id: TopicId,
    pub title: SubtitledText,
    pub version: u32,
    pub chapter_count: usize,
    pub first_story_id: Option<StoryId>,
    pub thumbnail: TopicThumbnail,
    pub play_availability: TopicPlayAvailability,
    pub translations: TranslationOverlay,
}

/// One encoding of the catalog assets.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    fn mode(&self) -> BackendMode;

    /// Classroom ids in index order.
    async fn classroom_ids(&self) -> Result<Vec<ClassroomId>>;

    async fn classroom(&self, classroom_id: &str) -> Result<ClassroomEntry>;

    async fn topic(&self, topic_id: &str) -> Result<TopicEntry>;
}

pub fn select_backend(mode: BackendMode, assets: Arc<AssetRepository>) -> Arc<dyn CatalogBackend> {
    match mode {
        BackendMode::Records => Arc::new(RecordBackend::new(assets)),
        BackendMode::Documents => Arc::new(DocumentBackend::new(assets)),
    }
}
