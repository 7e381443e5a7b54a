use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::locale::normalize_tag;

/// Base (untranslated) text fragment of a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubtitledText {
    pub content_id: String,
    pub html: String,
}

impl SubtitledText {
    pub fn new(content_id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            html: html.into(),
        }
    }
}

/// Per-locale alternate text: content id -> locale tag -> text.
///
/// Tags are normalized on insertion and on deserialization so lookups can use
/// [`ContentLocale::selection_chain`](super::ContentLocale::selection_chain)
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TranslationOverlay {
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl TranslationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        content_id: impl Into<String>,
        tag: &str,
        text: impl Into<String>,
    ) -> &mut Self {
        self.entries
            .entry(content_id.into())
            .or_default()
            .insert(normalize_tag(tag), text.into());
        self
    }

    pub fn with(mut self, content_id: impl Into<String>, tag: &str, text: impl Into<String>) -> Self {
        self.insert(content_id, tag, text);
        self
    }

    /// Variant text for `content_id` in `tag`, if any.
    pub fn variant(&self, content_id: &str, tag: &str) -> Option<&str> {
        self.entries
            .get(content_id)
            .and_then(|variants| variants.get(&normalize_tag(tag)))
            .map(String::as_str)
    }

    /// Every `(content id, text)` pair translated into `tag`.
    pub fn translations_for(&self, tag: &str) -> IndexMap<String, String> {
        let tag = normalize_tag(tag);
        self.entries
            .iter()
            .filter_map(|(content_id, variants)| {
                variants
                    .get(&tag)
                    .map(|text| (content_id.clone(), text.clone()))
            })
            .collect()
    }

    pub fn content_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(IndexMap::is_empty)
    }
}

impl<'de> Deserialize<'de> for TranslationOverlay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, IndexMap<String, String>>::deserialize(deserializer)?;
        let mut overlay = TranslationOverlay::new();
        for (content_id, variants) in raw {
            // Keep content ids that carry no variants.
            let entry = overlay.entries.entry(content_id).or_default();
            for (tag, text) in variants {
                entry.insert(normalize_tag(&tag), text);
            }
        }
        Ok(overlay)
    }
}

/// Displayable text after overlay selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedText {
    pub content_id: String,
    pub text: String,
    /// Normalized tag of the variant that was used; `None` means the base text.
    pub locale: Option<String>,
}

impl ResolvedText {
    pub fn is_translated(&self) -> bool {
        self.locale.is_some()
    }
}

/// Translations chosen for one entity, handed to later rendering stages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WrittenTranslationContext {
    /// Tag the translations were taken from; `None` when nothing matched.
    pub language: Option<String>,
    pub translations: IndexMap<String, String>,
}
