use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use syllabus_api::{
    ClassroomId, ClassroomService, ClassroomSummary, ContentLocale, LocaleService, ProfileId,
    Provider, TopicSummary,
};
use syllabus_provider::{ProviderKey, ProviderRegistry};
use tracing::info;

use super::backend::select_backend;
use super::resolver::CatalogResolver;
use crate::asset::{AssetRepository, AssetSource, FsAssetSource};
use crate::config::CatalogConfig;
use crate::locale::LocaleResolver;
use crate::session::SessionContext;

/// Source of the per-controller key namespace.
static NEXT_CONTROLLER: AtomicU64 = AtomicU64::new(0);

/// Caller-facing catalog API.
///
/// Every list is a provider derived from the caller's content locale, so it is
/// recomputed when that locale changes and served from cache otherwise.
pub struct ClassroomController {
    /// Prefix of every provider key, unique per controller so controllers
    /// sharing a registry never see each other's nodes.
    namespace: String,
    registry: ProviderRegistry,
    session: Arc<SessionContext>,
    locales: Arc<LocaleResolver>,
    resolver: CatalogResolver,
    config: CatalogConfig,
}

pub struct ClassroomControllerBuilder {
    config: CatalogConfig,
    source: Option<Arc<dyn AssetSource>>,
    registry: Option<ProviderRegistry>,
    session: Option<Arc<SessionContext>>,
}

impl ClassroomControllerBuilder {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            source: None,
            registry: None,
            session: None,
        }
    }

    /// Read assets from `source` instead of `config.asset_root`.
    pub fn with_source(mut self, source: Arc<dyn AssetSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> ClassroomController {
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(FsAssetSource::new(self.config.asset_root.clone())));
        let registry = self.registry.unwrap_or_default();
        let session = self
            .session
            .unwrap_or_else(|| Arc::new(SessionContext::from_config(&self.config)));

        let namespace = format!(
            "catalog-{}",
            NEXT_CONTROLLER.fetch_add(1, Ordering::Relaxed)
        );

        let assets = Arc::new(AssetRepository::new(source));
        let resolver = CatalogResolver::new(select_backend(self.config.backend, assets));
        let locales = Arc::new(LocaleResolver::new(
            registry.clone(),
            Arc::clone(&session),
            namespace.clone(),
        ));

        info!(namespace = %namespace, backend = %self.config.backend, "classroom controller ready");
        ClassroomController {
            namespace,
            registry,
            session,
            locales,
            resolver,
            config: self.config,
        }
    }
}

impl ClassroomController {
    pub fn builder(config: CatalogConfig) -> ClassroomControllerBuilder {
        ClassroomControllerBuilder::new(config)
    }

    pub fn locales(&self) -> &Arc<LocaleResolver> {
        &self.locales
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &CatalogResolver {
        &self.resolver
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, parts: &[&str]) -> ProviderKey {
        let namespace = std::iter::once(self.namespace.as_str());
        ProviderKey::from_parts(namespace.chain(parts.iter().copied()))
    }

    /// The active classroom id as a provider.
    ///
    /// [`switch_classroom`](ClassroomService::switch_classroom) only marks it
    /// stale; the new id is picked up on the next read.
    pub fn selected_classroom(&self) -> Provider<ClassroomId> {
        let session = Arc::clone(&self.session);
        self.registry.source(self.key(&["selected_classroom_id"]), move || {
            let classroom_id = session.selected_classroom();
            async move { Ok::<_, Infallible>(classroom_id) }
        })
    }

    /// Playable topics of whichever classroom is active.
    pub fn get_selected_topic_list(&self, profile: &ProfileId) -> Provider<Vec<TopicSummary>> {
        let resolver = self.resolver.clone();
        self.locales.content_locale(profile).combine_with(
            &self.selected_classroom(),
            self.key(&["selected_topic_list", profile.as_str()]),
            move |locale: Arc<ContentLocale>, classroom_id: Arc<ClassroomId>| {
                let resolver = resolver.clone();
                async move { resolver.topic_list(&classroom_id, &locale).await }
            },
        )
    }
}

impl ClassroomService for ClassroomController {
    fn get_classroom_list(&self, profile: &ProfileId) -> Provider<Vec<ClassroomSummary>> {
        let resolver = self.resolver.clone();
        self.locales.content_locale(profile).transform(
            self.key(&["classroom_list", profile.as_str()]),
            move |locale: Arc<ContentLocale>| {
                let resolver = resolver.clone();
                async move { resolver.classroom_list(&locale).await }
            },
        )
    }

    fn get_topic_list(&self, profile: &ProfileId, classroom_id: &str) -> Provider<Vec<TopicSummary>> {
        let key = self.key(&["topic_list", profile.as_str(), classroom_id]);
        let resolver = self.resolver.clone();
        let classroom_id = classroom_id.to_string();
        self.locales.content_locale(profile).transform(
            key,
            move |locale: Arc<ContentLocale>| {
                let resolver = resolver.clone();
                let classroom_id = classroom_id.clone();
                async move { resolver.topic_list(&classroom_id, &locale).await }
            },
        )
    }

    fn switch_classroom(&self, classroom_id: &str) {
        let previous = self.session.select_classroom(classroom_id);
        info!(from = %previous, to = %classroom_id, "classroom switched");
        self.registry
            .invalidate(&self.key(&["selected_classroom_id"]));
    }

    fn get_selected_classroom_id(&self) -> ClassroomId {
        self.session.selected_classroom()
    }
}

#[async_trait]
impl LocaleService for ClassroomController {
    fn content_locale(&self, profile: &ProfileId) -> Provider<ContentLocale> {
        self.locales.content_locale(profile)
    }

    async fn set_content_locale(&self, profile: &ProfileId, locale: ContentLocale) {
        self.locales.set_content_locale(profile, locale).await
    }

    async fn clear_content_locale(&self, profile: &ProfileId) {
        self.locales.clear_content_locale(profile).await
    }
}
