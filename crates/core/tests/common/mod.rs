#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use syllabus_api::{SubtitledText, TopicThumbnail, TranslationOverlay};
use syllabus_core::asset::{
    ChapterRecord, ClassroomIdList, ClassroomRecord, InMemoryAssetSource, StoryRecord, TopicRecord,
};
use syllabus_core::{BackendMode, CatalogConfig, ClassroomController};

pub struct ClassroomFixture {
    pub id: &'static str,
    pub title: &'static str,
    pub arabic_title: Option<&'static str>,
    pub topic_ids: &'static [&'static str],
}

pub struct TopicFixture {
    pub id: &'static str,
    pub title: &'static str,
    pub arabic_title: Option<&'static str>,
    pub published: bool,
    pub version: Option<u32>,
    /// (story id, chapter count)
    pub stories: &'static [(&'static str, usize)],
}

pub const CLASSROOMS: &[ClassroomFixture] = &[
    ClassroomFixture {
        id: "c0",
        title: "Math",
        arabic_title: Some("رياضيات"),
        topic_ids: &["fractions", "ratios", "geometry"],
    },
    ClassroomFixture {
        id: "c1",
        title: "Science",
        arabic_title: None,
        topic_ids: &["plants"],
    },
];

pub const TOPICS: &[TopicFixture] = &[
    TopicFixture {
        id: "fractions",
        title: "Fractions",
        arabic_title: Some("الكسور"),
        published: true,
        version: Some(4),
        stories: &[("fractions_story_0", 2), ("fractions_story_1", 3)],
    },
    TopicFixture {
        id: "ratios",
        title: "Ratios",
        arabic_title: None,
        published: false,
        version: None,
        stories: &[("ratios_story_0", 1)],
    },
    TopicFixture {
        id: "geometry",
        title: "Geometry",
        arabic_title: None,
        published: true,
        version: None,
        stories: &[],
    },
    TopicFixture {
        id: "plants",
        title: "Plants",
        arabic_title: Some("النباتات"),
        published: true,
        version: Some(1),
        stories: &[("plants_story_0", 4)],
    },
];

pub fn profile() -> syllabus_api::ProfileId {
    syllabus_api::ProfileId::new("learner")
}

fn classroom_title_overlay(classroom: &ClassroomFixture) -> TranslationOverlay {
    let mut overlay = TranslationOverlay::new();
    if let Some(text) = classroom.arabic_title {
        overlay.insert("classroom_title", "ar", text);
    }
    overlay
}

fn topic_title_overlay(topic: &TopicFixture) -> TranslationOverlay {
    let mut overlay = TranslationOverlay::new();
    if let Some(text) = topic.arabic_title {
        overlay.insert("title", "ar", text);
    }
    overlay
}

fn thumbnail(topic: &TopicFixture) -> TopicThumbnail {
    TopicThumbnail {
        filename: format!("{}.png", topic.id),
        background_color: "#f7a541".to_string(),
    }
}

pub fn topic_document(topic: &TopicFixture) -> Value {
    let stories: Vec<Value> = topic
        .stories
        .iter()
        .map(|(id, chapters)| {
            let titles: Vec<String> = (0..*chapters).map(|i| format!("Chapter {i}")).collect();
            json!({"id": id, "node_titles": titles})
        })
        .collect();
    let mut doc = json!({
        "topic_name": topic.title,
        "published": topic.published,
        "canonical_story_dicts": stories,
        "thumbnail_filename": thumbnail(topic).filename,
        "thumbnail_bg_color": thumbnail(topic).background_color,
        "written_translations": topic_title_overlay(topic),
    });
    if let Some(version) = topic.version {
        doc["version"] = json!(version);
    }
    doc
}

pub fn document_source() -> Arc<InMemoryAssetSource> {
    let source = InMemoryAssetSource::new();
    let ids: Vec<&str> = CLASSROOMS.iter().map(|c| c.id).collect();
    source.insert_json("classrooms", &json!({"classroom_id_list": ids}));

    for classroom in CLASSROOMS {
        source.insert_json(
            classroom.id,
            &json!({
                "id": classroom.id,
                "translatable_title": {"content_id": "classroom_title", "html": classroom.title},
                "topic_ids": classroom.topic_ids,
                "written_translations": classroom_title_overlay(classroom),
            }),
        );
    }
    for topic in TOPICS {
        source.insert_json(topic.id, &topic_document(topic));
    }
    Arc::new(source)
}

pub fn record_source() -> Arc<InMemoryAssetSource> {
    let source = InMemoryAssetSource::new();
    source
        .insert_record(
            "classrooms",
            &ClassroomIdList {
                classroom_ids: CLASSROOMS.iter().map(|c| c.id.to_string()).collect(),
            },
        )
        .unwrap();

    for classroom in CLASSROOMS {
        let record = ClassroomRecord {
            classroom_id: classroom.id.to_string(),
            title: SubtitledText::new("classroom_title", classroom.title),
            topic_ids: classroom.topic_ids.iter().map(|t| t.to_string()).collect(),
            written_translations: classroom_title_overlay(classroom),
        };
        source.insert_record(classroom.id, &record).unwrap();
    }
    for topic in TOPICS {
        let record = TopicRecord {
            topic_id: topic.id.to_string(),
            title: SubtitledText::new("title", topic.title),
            published: topic.published,
            version: topic.version.unwrap_or_default(),
            story_ids: topic.stories.iter().map(|(id, _)| id.to_string()).collect(),
            thumbnail: thumbnail(topic),
            written_translations: topic_title_overlay(topic),
        };
        source.insert_record(topic.id, &record).unwrap();

        for (story_id, chapters) in topic.stories {
            let story = StoryRecord {
                story_id: story_id.to_string(),
                title: SubtitledText::new("title", format!("{} story", topic.title)),
                chapters: (0..*chapters)
                    .map(|i| ChapterRecord {
                        exploration_id: format!("{story_id}_exp_{i}"),
                        title: SubtitledText::new("title", format!("Chapter {i}")),
                    })
                    .collect(),
            };
            source.insert_record(story_id, &story).unwrap();
        }
    }
    Arc::new(source)
}

pub fn source_for(mode: BackendMode) -> Arc<InMemoryAssetSource> {
    match mode {
        BackendMode::Records => record_source(),
        BackendMode::Documents => document_source(),
    }
}

/// Controller over the fixture catalog in `mode`, plus the source so tests can
/// break or fix assets.
pub fn controller(mode: BackendMode) -> (Arc<InMemoryAssetSource>, ClassroomController) {
    let source = source_for(mode);
    let config = CatalogConfig::default()
        .with_backend(mode)
        .with_default_classroom("c0");
    let controller = ClassroomController::builder(config)
        .with_source(source.clone())
        .build();
    (source, controller)
}

pub const BOTH_MODES: [BackendMode; 2] = [BackendMode::Records, BackendMode::Documents];
