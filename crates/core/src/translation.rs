//! Selection of translated text out of per-entity overlays.

use syllabus_api::{
    ContentLocale, ResolvedText, SubtitledText, TranslationOverlay, WrittenTranslationContext,
};

/// Pick the text to display for `base`.
///
/// Tries the locale's exact tag, then each remaining tag of its selection
/// chain, and finally falls back to the base fragment unchanged.
pub fn merge(
    base: &SubtitledText,
    overlay: &TranslationOverlay,
    locale: &ContentLocale,
) -> ResolvedText {
    locale
        .selection_chain()
        .into_iter()
        .find_map(|tag| {
            overlay
                .variant(&base.content_id, &tag)
                .map(|text| ResolvedText {
                    content_id: base.content_id.clone(),
                    text: text.to_string(),
                    locale: Some(tag),
                })
        })
        .unwrap_or_else(|| ResolvedText {
            content_id: base.content_id.clone(),
            text: base.html.clone(),
            locale: None,
        })
}

/// Translations of one entity in the first chain language the overlay covers.
pub fn translation_context(
    overlay: &TranslationOverlay,
    locale: &ContentLocale,
) -> WrittenTranslationContext {
    locale
        .selection_chain()
        .into_iter()
        .find_map(|tag| {
            let translations = overlay.translations_for(&tag);
            (!translations.is_empty()).then(|| WrittenTranslationContext {
                language: Some(tag),
                translations,
            })
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title() -> SubtitledText {
        SubtitledText::new("title", "Fractions")
    }

    #[test]
    fn test_exact_tag_wins() {
        let overlay = TranslationOverlay::new()
            .with("title", "pt-BR", "Frações (BR)")
            .with("title", "pt", "Frações");
        let locale = ContentLocale::new("pt").with_region("BR");

        let resolved = merge(&title(), &overlay, &locale);
        assert_eq!(resolved.text, "Frações (BR)");
        assert_eq!(resolved.locale.as_deref(), Some("pt-br"));
    }

    #[test]
    fn test_chain_fallback() {
        let overlay = TranslationOverlay::new()
            .with("title", "pt", "Frações")
            .with("title", "ar", "الكسور");
        let regional = ContentLocale::new("pt").with_region("BR");
        assert_eq!(merge(&title(), &overlay, &regional).text, "Frações");

        let explicit = ContentLocale::new("sw").with_fallback("ar");
        assert_eq!(merge(&title(), &overlay, &explicit).text, "الكسور");
    }

    #[test]
    fn test_base_when_nothing_matches() {
        let resolved = merge(&title(), &TranslationOverlay::new(), &ContentLocale::new("hi"));
        assert_eq!(resolved.text, "Fractions");
        assert!(!resolved.is_translated());

        let other_id = TranslationOverlay::new().with("description", "hi", "भिन्न");
        assert_eq!(merge(&title(), &other_id, &ContentLocale::new("hi")).text, "Fractions");
    }

    #[test]
    fn test_context_uses_first_covered_language() {
        let overlay = TranslationOverlay::new()
            .with("title", "ar", "الكسور")
            .with("description", "ar", "وصف");
        let locale = ContentLocale::new("ar").with_region("EG");

        let context = translation_context(&overlay, &locale);
        assert_eq!(context.language.as_deref(), Some("ar"));
        assert_eq!(context.translations.len(), 2);

        let none = translation_context(&overlay, &ContentLocale::new("en"));
        assert_eq!(none, WrittenTranslationContext::default());
    }
}
