use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use syllabus_api::{ClassroomId, TopicPlayAvailability};
use tracing::debug;

use super::backend::{CLASSROOM_INDEX, CatalogBackend, ClassroomEntry, TopicEntry};
use crate::asset::{AssetRepository, ClassroomIdList, ClassroomRecord, StoryRecord, TopicRecord};
use crate::config::BackendMode;
use crate::error::{CatalogError, Result};

/// Catalog backed by MessagePack records.
pub struct RecordBackend {
    assets: Arc<AssetRepository>,
}

impl RecordBackend {
    pub fn new(assets: Arc<AssetRepository>) -> Self {
        Self { assets }
    }

    async fn story(&self, topic_id: &str, story_id: &str) -> Result<StoryRecord> {
        match self.assets.read_record::<StoryRecord>(story_id).await {
            Err(CatalogError::AssetNotFound(_)) => Err(CatalogError::malformed(
                topic_id,
                format!("references missing story '{story_id}'"),
            )),
            other => other,
        }
    }
}

#[async_trait]
impl CatalogBackend for RecordBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Records
    }

    async fn classroom_ids(&self) -> Result<Vec<ClassroomId>> {
        let index: ClassroomIdList = self.assets.read_record(CLASSROOM_INDEX).await?;
        Ok(index.classroom_ids)
    }

    async fn classroom(&self, classroom_id: &str) -> Result<ClassroomEntry> {
        let record: ClassroomRecord = self.assets.read_record(classroom_id).await?;
        Ok(ClassroomEntry {
            classroom_id: record.classroom_id,
            title: record.title,
            topic_ids: record.topic_ids,
            translations: record.written_translations,
        })
    }

    async fn topic(&self, topic_id: &str) -> Result<TopicEntry> {
        let record: TopicRecord = self.assets.read_record(topic_id).await?;
        let stories = try_join_all(
            record
                .story_ids
                .iter()
                .map(|story_id| self.story(topic_id, story_id)),
        )
        .await?;
        debug!(topic = %topic_id, stories = stories.len(), "topic record loaded");

        Ok(TopicEntry {
            topic_id: record.topic_id,
            title: record.title,
            version: record.version,
            chapter_count: stories.iter().map(|s| s.chapters.len()).sum(),
            first_story_id: stories.first().map(|s| s.story_id.clone()),
            thumbnail: record.thumbnail,
            play_availability: TopicPlayAvailability::from_published(record.published),
            translations: record.written_translations,
        })
    }
}
