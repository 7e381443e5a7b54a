use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use syllabus_api::{
    ClassroomId, SubtitledText, TopicPlayAvailability, TopicThumbnail, TranslationOverlay,
};

use super::backend::{CLASSROOM_INDEX, CatalogBackend, ClassroomEntry, TopicEntry};
use crate::asset::AssetRepository;
use crate::config::BackendMode;
use crate::error::{CatalogError, Result};

/// Content id given to a topic's `topic_name`.
pub const TOPIC_TITLE_CONTENT_ID: &str = "title";

/// Catalog backed by loosely typed JSON documents.
///
/// Every field read is type-checked; a missing or mistyped field makes the
/// whole asset malformed.
pub struct DocumentBackend {
    assets: Arc<AssetRepository>,
}

impl DocumentBackend {
    pub fn new(assets: Arc<AssetRepository>) -> Self {
        Self { assets }
    }
}

#[async_trait]
impl CatalogBackend for DocumentBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Documents
    }

    async fn classroom_ids(&self) -> Result<Vec<ClassroomId>> {
        let doc = self.assets.read_document(CLASSROOM_INDEX).await?;
        strings(&doc, CLASSROOM_INDEX, "classroom_id_list")
    }

    async fn classroom(&self, classroom_id: &str) -> Result<ClassroomEntry> {
        let doc = self.assets.read_document(classroom_id).await?;
        Ok(ClassroomEntry {
            classroom_id: string(&doc, classroom_id, "id")?,
            title: SubtitledText::new(
                string(&doc, classroom_id, "translatable_title.content_id")?,
                string(&doc, classroom_id, "translatable_title.html")?,
            ),
            topic_ids: strings(&doc, classroom_id, "topic_ids")?,
            translations: overlay(&doc, classroom_id)?,
        })
    }

    async fn topic(&self, topic_id: &str) -> Result<TopicEntry> {
        let doc = self.assets.read_document(topic_id).await?;
        let stories = array(&doc, topic_id, "canonical_story_dicts")?;

        let mut chapter_count = 0;
        for story in stories {
            chapter_count += array(story, topic_id, "node_titles")?.len();
        }
        let first_story_id = stories
            .first()
            .map(|story| string(story, topic_id, "id"))
            .transpose()?;

        Ok(TopicEntry {
            topic_id: topic_id.to_string(),
            title: SubtitledText::new(
                TOPIC_TITLE_CONTENT_ID,
                string(&doc, topic_id, "topic_name")?,
            ),
            version: version(&doc, topic_id)?,
            chapter_count,
            first_story_id,
            thumbnail: TopicThumbnail {
                filename: optional_string(&doc, topic_id, "thumbnail_filename")?,
                background_color: optional_string(&doc, topic_id, "thumbnail_bg_color")?,
            },
            play_availability: TopicPlayAvailability::from_published(boolean(
                &doc, topic_id, "published",
            )?),
            translations: overlay(&doc, topic_id)?,
        })
    }
}

/// Walk a dotted path such as `translatable_title.html`.
fn optional<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |value, segment| value.get(segment))
        .filter(|value| !value.is_null())
}

fn required<'a>(doc: &'a Value, asset: &str, path: &str) -> Result<&'a Value> {
    optional(doc, path)
        .ok_or_else(|| CatalogError::malformed(asset, format!("missing field '{path}'")))
}

fn mistyped(asset: &str, path: &str, expected: &str) -> CatalogError {
    CatalogError::malformed(asset, format!("field '{path}' is not {expected}"))
}

fn string(doc: &Value, asset: &str, path: &str) -> Result<String> {
    required(doc, asset, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mistyped(asset, path, "a string"))
}

fn optional_string(doc: &Value, asset: &str, path: &str) -> Result<String> {
    match optional(doc, path) {
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mistyped(asset, path, "a string")),
        None => Ok(String::new()),
    }
}

/// Optional non-negative integer, `0` when absent. Integral floats such as
/// `4.0` are accepted.
fn version(doc: &Value, asset: &str) -> Result<u32> {
    let Some(value) = optional(doc, "version") else {
        return Ok(0);
    };
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
                .map(|v| v as u64)
        })
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| mistyped(asset, "version", "a non-negative integer"))
}

fn boolean(doc: &Value, asset: &str, path: &str) -> Result<bool> {
    required(doc, asset, path)?
        .as_bool()
        .ok_or_else(|| mistyped(asset, path, "a boolean"))
}

fn array<'a>(doc: &'a Value, asset: &str, path: &str) -> Result<&'a Vec<Value>> {
    required(doc, asset, path)?
        .as_array()
        .ok_or_else(|| mistyped(asset, path, "an array"))
}

fn strings(doc: &Value, asset: &str, path: &str) -> Result<Vec<String>> {
    array(doc, asset, path)?
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| mistyped(asset, path, "an array of strings"))
        })
        .collect()
}

/// `written_translations`: `{ content_id: { tag: text } }`.
fn overlay(doc: &Value, asset: &str) -> Result<TranslationOverlay> {
    const PATH: &str = "written_translations";
    let mut overlay = TranslationOverlay::new();
    let Some(value) = optional(doc, PATH) else {
        return Ok(overlay);
    };
    let by_content = value
        .as_object()
        .ok_or_else(|| mistyped(asset, PATH, "an object"))?;
    for (content_id, variants) in by_content {
        let variants = variants
            .as_object()
            .ok_or_else(|| mistyped(asset, PATH, "a map of locale variants"))?;
        for (tag, text) in variants {
            let text = text
                .as_str()
                .ok_or_else(|| mistyped(asset, PATH, "a map of translated strings"))?;
            overlay.insert(content_id.as_str(), tag, text);
        }
    }
    Ok(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dotted_path_lookup() {
        let doc = json!({"translatable_title": {"html": "Math", "content_id": null}});
        assert_eq!(string(&doc, "c0", "translatable_title.html").unwrap(), "Math");
        assert!(matches!(
            string(&doc, "c0", "translatable_title.content_id"),
            Err(CatalogError::MalformedAsset { .. })
        ));
        assert!(optional(&doc, "translatable_title.html.deeper").is_none());
    }

    #[test]
    fn test_mistyped_fields_are_malformed() {
        let doc = json!({"published": "yes", "topic_ids": ["t0", 3]});
        assert!(boolean(&doc, "t0", "published").is_err());
        let err = strings(&doc, "c0", "topic_ids").unwrap_err();
        assert_eq!(err.asset(), Some("c0"));
    }

    #[test]
    fn test_version_accepts_integral_numbers() {
        assert_eq!(version(&json!({}), "t0").unwrap(), 0);
        assert_eq!(version(&json!({"version": 4}), "t0").unwrap(), 4);
        assert_eq!(version(&json!({"version": 4.0}), "t0").unwrap(), 4);
        assert!(version(&json!({"version": 4.5}), "t0").is_err());
        assert!(version(&json!({"version": -1}), "t0").is_err());
        assert!(version(&json!({"version": "4"}), "t0").is_err());
    }

    #[test]
    fn test_overlay_is_optional() {
        assert!(overlay(&json!({}), "t0").unwrap().is_empty());
        let parsed = overlay(
            &json!({"written_translations": {"title": {"pt_BR": "Frações"}}}),
            "t0",
        )
        .unwrap();
        assert_eq!(parsed.variant("title", "pt-br"), Some("Frações"));
        assert!(overlay(&json!({"written_translations": []}), "t0").is_err());
    }
}
