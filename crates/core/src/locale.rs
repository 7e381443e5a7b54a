//! Per-profile content locale exposed as source providers.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use syllabus_api::{ContentLocale, LocaleService, ProfileId, Provider};
use syllabus_provider::{ProviderKey, ProviderRegistry};
use tracing::debug;

use crate::session::SessionContext;

pub struct LocaleResolver {
    registry: ProviderRegistry,
    session: Arc<SessionContext>,
    /// Prefix of every key this resolver registers. Resolvers over different
    /// sessions must not share one.
    namespace: String,
}

impl LocaleResolver {
    pub fn new(
        registry: ProviderRegistry,
        session: Arc<SessionContext>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            session,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn provider_key(&self, profile: &ProfileId) -> ProviderKey {
        ProviderKey::from_parts([self.namespace.as_str(), "content_locale", profile.as_str()])
    }

    /// The locale `profile` currently resolves to, without going through the
    /// provider cache.
    pub fn current(&self, profile: &ProfileId) -> ContentLocale {
        self.session.content_locale(profile)
    }

    pub fn system_default(&self) -> &ContentLocale {
        self.session.default_locale()
    }
}

#[async_trait]
impl LocaleService for LocaleResolver {
    fn content_locale(&self, profile: &ProfileId) -> Provider<ContentLocale> {
        let session = Arc::clone(&self.session);
        let profile = profile.clone();
        self.registry
            .source(self.provider_key(&profile), move || {
                let locale = session.content_locale(&profile);
                async move { Ok::<_, Infallible>(locale) }
            })
    }

    async fn set_content_locale(&self, profile: &ProfileId, locale: ContentLocale) {
        debug!(profile = %profile, locale = %locale, "content locale set");
        self.session.set_locale(profile.clone(), locale);
        self.registry
            .notify_change(&self.provider_key(profile))
            .await;
    }

    async fn clear_content_locale(&self, profile: &ProfileId) {
        if self.session.clear_locale(profile).is_none() {
            return;
        }
        debug!(profile = %profile, "content locale cleared");
        self.registry
            .notify_change(&self.provider_key(profile))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LocaleResolver {
        LocaleResolver::new(
            ProviderRegistry::new(),
            Arc::new(SessionContext::new("c0", ContentLocale::new("en"))),
            "test",
        )
    }

    #[tokio::test]
    async fn test_missing_preference_uses_default() {
        let locales = resolver();
        let locale = locales
            .content_locale(&ProfileId::new("p"))
            .retrieve()
            .await
            .unwrap();
        assert_eq!(*locale, ContentLocale::new("en"));
    }

    #[tokio::test]
    async fn test_set_and_clear_are_observed() {
        let locales = resolver();
        let profile = ProfileId::new("p");
        let provider = locales.content_locale(&profile);
        assert_eq!(*provider.retrieve().await.unwrap(), ContentLocale::new("en"));

        locales
            .set_content_locale(&profile, ContentLocale::new("sw"))
            .await;
        assert_eq!(*provider.retrieve().await.unwrap(), ContentLocale::new("sw"));

        locales.clear_content_locale(&profile).await;
        assert_eq!(*provider.retrieve().await.unwrap(), ContentLocale::new("en"));
        assert_eq!(provider.computations(), 3);
    }

    #[tokio::test]
    async fn test_namespaces_keep_sessions_apart() {
        let registry = ProviderRegistry::new();
        let english = LocaleResolver::new(
            registry.clone(),
            Arc::new(SessionContext::new("c0", ContentLocale::new("en"))),
            "english",
        );
        let swahili = LocaleResolver::new(
            registry.clone(),
            Arc::new(SessionContext::new("c0", ContentLocale::new("sw"))),
            "swahili",
        );
        let profile = ProfileId::new("p");

        let a = english.content_locale(&profile).retrieve().await.unwrap();
        let b = swahili.content_locale(&profile).retrieve().await.unwrap();
        assert_eq!(*a, ContentLocale::new("en"));
        assert_eq!(*b, ContentLocale::new("sw"));
        assert_ne!(english.provider_key(&profile), swahili.provider_key(&profile));
    }
}
