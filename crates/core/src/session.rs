//! Process-wide selection state shared by the locale and catalog layers.

use std::sync::{PoisonError, RwLock};

use dashmap::DashMap;
use syllabus_api::{ClassroomId, ContentLocale, ProfileId};

use crate::config::CatalogConfig;

/// Active classroom and per-profile locale preferences.
///
/// The selected classroom is overwritten by switches and never cleared.
#[derive(Debug)]
pub struct SessionContext {
    selected_classroom: RwLock<ClassroomId>,
    default_locale: ContentLocale,
    locales: DashMap<ProfileId, ContentLocale>,
}

impl SessionContext {
    pub fn new(default_classroom_id: impl Into<ClassroomId>, default_locale: ContentLocale) -> Self {
        Self {
            selected_classroom: RwLock::new(default_classroom_id.into()),
            default_locale,
            locales: DashMap::new(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config.default_classroom_id.clone(),
            config.default_locale.clone(),
        )
    }

    pub fn selected_classroom(&self) -> ClassroomId {
        self.selected_classroom
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the previously selected classroom.
    pub fn select_classroom(&self, classroom_id: impl Into<ClassroomId>) -> ClassroomId {
        let mut selected = self
            .selected_classroom
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *selected, classroom_id.into())
    }

    pub fn default_locale(&self) -> &ContentLocale {
        &self.default_locale
    }

    /// Stored preference for `profile`, if any.
    pub fn locale_preference(&self, profile: &ProfileId) -> Option<ContentLocale> {
        self.locales.get(profile).map(|entry| entry.value().clone())
    }

    /// Stored preference or the default locale.
    pub fn content_locale(&self, profile: &ProfileId) -> ContentLocale {
        self.locale_preference(profile)
            .unwrap_or_else(|| self.default_locale.clone())
    }

    pub fn set_locale(&self, profile: ProfileId, locale: ContentLocale) -> Option<ContentLocale> {
        self.locales.insert(profile, locale)
    }

    pub fn clear_locale(&self, profile: &ProfileId) -> Option<ContentLocale> {
        self.locales.remove(profile).map(|(_, locale)| locale)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_is_overwritten() {
        let session = SessionContext::new("c0", ContentLocale::default());
        assert_eq!(session.selected_classroom(), "c0");
        assert_eq!(session.select_classroom("c1"), "c0");
        assert_eq!(session.selected_classroom(), "c1");
    }

    #[test]
    fn test_locale_preference_falls_back_to_default() {
        let session = SessionContext::new("c0", ContentLocale::new("en"));
        let profile = ProfileId::new("learner");
        assert_eq!(session.content_locale(&profile), ContentLocale::new("en"));

        session.set_locale(profile.clone(), ContentLocale::new("ar"));
        assert_eq!(session.content_locale(&profile), ContentLocale::new("ar"));

        assert!(session.clear_locale(&profile).is_some());
        assert!(session.locale_preference(&profile).is_none());
    }
}
