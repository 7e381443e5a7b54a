use crate::models::{ContentLocale, ProfileId};
use async_trait::async_trait;
use syllabus_provider::Provider;

#[async_trait]
pub trait LocaleService: Send + Sync {
    /// Observable content locale of `profile`.
    ///
    /// Falls back to the system default when the profile has no preference.
    fn content_locale(&self, profile: &ProfileId) -> Provider<ContentLocale>;

    /// Store a preference and push the change to every subscribed provider
    /// derived from this profile's locale.
    async fn set_content_locale(&self, profile: &ProfileId, locale: ContentLocale);

    /// Drop the stored preference, reverting to the system default.
    async fn clear_content_locale(&self, profile: &ProfileId);
}
