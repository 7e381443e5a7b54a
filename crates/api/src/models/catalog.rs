use serde::{Deserialize, Serialize};
use std::fmt;

use super::text::{ResolvedText, WrittenTranslationContext};

pub type ClassroomId = String;
pub type TopicId = String;
pub type StoryId = String;

/// Identity of the caller whose preferences drive localization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicPlayAvailability {
    AvailableNow,
    AvailableInFuture,
}

impl TopicPlayAvailability {
    pub fn from_published(published: bool) -> Self {
        if published {
            TopicPlayAvailability::AvailableNow
        } else {
            TopicPlayAvailability::AvailableInFuture
        }
    }

    pub fn is_available_now(self) -> bool {
        matches!(self, TopicPlayAvailability::AvailableNow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopicThumbnail {
    pub filename: String,
    /// `#rrggbb`
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic_id: TopicId,
    pub title: ResolvedText,
    pub version: u32,
    /// Sum of chapters across the topic's stories.
    pub total_chapter_count: usize,
    pub thumbnail: TopicThumbnail,
    pub play_availability: TopicPlayAvailability,
    pub first_story_id: Option<StoryId>,
    pub translation_context: WrittenTranslationContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomSummary {
    pub classroom_id: ClassroomId,
    pub title: ResolvedText,
    /// In the order the classroom lists them.
    pub topic_summaries: Vec<TopicSummary>,
}
