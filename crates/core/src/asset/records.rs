//! Schemas of the structured (`.rec`) catalog assets.
//!
//! Records are MessagePack maps with named fields, so optional fields may be
//! omitted by whatever tool compiles the catalog.

use serde::{Deserialize, Serialize};
use syllabus_api::{
    ClassroomId, StoryId, SubtitledText, TopicId, TopicThumbnail, TranslationOverlay,
};

use crate::error::{CatalogError, Result};

/// Contents of the `classrooms` index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassroomIdList {
    pub classroom_ids: Vec<ClassroomId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomRecord {
    pub classroom_id: ClassroomId,
    pub title: SubtitledText,
    pub topic_ids: Vec<TopicId>,
    #[serde(default)]
    pub written_translations: TranslationOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub topic_id: TopicId,
    pub title: SubtitledText,
    pub published: bool,
    #[serde(default)]
    pub version: u32,
    pub story_ids: Vec<StoryId>,
    #[serde(default)]
    pub thumbnail: TopicThumbnail,
    #[serde(default)]
    pub written_translations: TranslationOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub story_id: StoryId,
    pub title: SubtitledText,
    pub chapters: Vec<ChapterRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub exploration_id: String,
    pub title: SubtitledText,
}

/// MessagePack bytes for `record`, in the layout `read_record` expects.
pub fn encode_record<R: Serialize>(name: &str, record: &R) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(record).map_err(|e| CatalogError::SchemaMismatch {
        asset: name.to_string(),
        reason: e.to_string(),
    })
}
