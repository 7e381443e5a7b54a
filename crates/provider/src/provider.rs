use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use crate::ProviderValue;
use crate::error::ProviderResult;
use crate::key::ProviderKey;
use crate::node::Node;
use crate::registry::ProviderRegistry;

/// Handle to a registered provider.
///
/// Handles are cheap to clone; every clone (and every handle obtained by
/// registering the same key again) shares the same cached state.
pub struct Provider<T> {
    pub(crate) node: Arc<Node<T>>,
    pub(crate) registry: ProviderRegistry,
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            registry: self.registry.clone(),
        }
    }
}

/// Returned by [`Provider::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub key: ProviderKey,
    pub id: u64,
}

impl<T: ProviderValue> Provider<T> {
    pub fn key(&self) -> &ProviderKey {
        self.node.key()
    }

    /// Read the current value.
    ///
    /// Returns the cached value when no upstream changed. Otherwise computes
    /// it, attaching to an in-flight computation for the same key if there is
    /// one.
    pub async fn retrieve(&self) -> ProviderResult<T> {
        self.node.current().await.map(|(value, _)| value)
    }

    /// Register `callback` for every new value and every failure.
    ///
    /// The current value is delivered before this returns, computing it first
    /// if nothing is cached yet.
    pub async fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ProviderResult<T>) + Send + Sync + 'static,
    {
        let id = self.node.attach(Arc::new(callback));
        let _ = self.node.current().await;
        Subscription {
            key: self.key().clone(),
            id,
        }
    }

    /// Returns false when the subscription was not attached to this provider.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        subscription.key == *self.key() && self.node.detach(subscription.id)
    }

    /// Keys of the providers this one is derived from.
    pub fn upstream(&self) -> Vec<ProviderKey> {
        self.node.upstream()
    }

    /// Number of times the underlying computation has run.
    pub fn computations(&self) -> u64 {
        self.node.computations()
    }

    /// Shorthand for [`ProviderRegistry::transform`].
    pub fn transform<R, F, Fut, E>(&self, key: impl Into<ProviderKey>, transform: F) -> Provider<R>
    where
        R: ProviderValue,
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        self.registry.transform(self, key, transform)
    }

    /// Shorthand for [`ProviderRegistry::combine`].
    pub fn combine_with<B, R, F, Fut, E>(
        &self,
        other: &Provider<B>,
        key: impl Into<ProviderKey>,
        combine: F,
    ) -> Provider<R>
    where
        B: ProviderValue,
        R: ProviderValue,
        F: Fn(Arc<T>, Arc<B>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        self.registry.combine(self, other, key, combine)
    }
}
