use std::sync::Arc;

use futures::future::try_join_all;
use syllabus_api::{ClassroomSummary, ContentLocale, TopicSummary};
use tracing::debug;

use super::backend::CatalogBackend;
use crate::config::BackendMode;
use crate::error::Result;
use crate::translation::{merge, translation_context};

/// Builds localized summaries from one backend.
///
/// Holds no state of its own; repeated calls with the same arguments read the
/// same (cached) assets and produce equal results.
#[derive(Clone)]
pub struct CatalogResolver {
    backend: Arc<dyn CatalogBackend>,
}

impl CatalogResolver {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    pub fn mode(&self) -> BackendMode {
        self.backend.mode()
    }

    /// Every classroom in index order. Fails if any classroom fails.
    pub async fn classroom_list(&self, locale: &ContentLocale) -> Result<Vec<ClassroomSummary>> {
        let ids = self.backend.classroom_ids().await?;
        debug!(classrooms = ids.len(), locale = %locale, "resolving classroom list");
        try_join_all(ids.iter().map(|id| self.classroom_summary(id, locale))).await
    }

    pub async fn classroom_summary(
        &self,
        classroom_id: &str,
        locale: &ContentLocale,
    ) -> Result<ClassroomSummary> {
        let entry = self.backend.classroom(classroom_id).await?;
        let topic_summaries = try_join_all(
            entry
                .topic_ids
                .iter()
                .map(|topic_id| self.topic_summary(topic_id, locale)),
        )
        .await?;

        Ok(ClassroomSummary {
            title: merge(&entry.title, &entry.translations, locale),
            classroom_id: entry.classroom_id,
            topic_summaries,
        })
    }

    /// Playable topics of `classroom_id`, in classroom order.
    pub async fn topic_list(
        &self,
        classroom_id: &str,
        locale: &ContentLocale,
    ) -> Result<Vec<TopicSummary>> {
        let classroom = self.classroom_summary(classroom_id, locale).await?;
        Ok(classroom
            .topic_summaries
            .into_iter()
            .filter(|topic| topic.play_availability.is_available_now())
            .collect())
    }

    pub async fn topic_summary(&self, topic_id: &str, locale: &ContentLocale) -> Result<TopicSummary> {
        let entry = self.backend.topic(topic_id).await?;
        Ok(TopicSummary {
            title: merge(&entry.title, &entry.translations, locale),
            translation_context: translation_context(&entry.translations, locale),
            topic_id: entry.topic_id,
            version: entry.version,
            total_chapter_count: entry.chapter_count,
            thumbnail: entry.thumbnail,
            play_availability: entry.play_availability,
            first_story_id: entry.first_story_id,
        })
    }
}
