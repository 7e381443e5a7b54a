//! Registry owning every provider node and the dependency edges between them.

use std::any::Any;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::join_all;
use tracing::{debug, trace, warn};

use crate::ProviderValue;
use crate::key::ProviderKey;
use crate::node::{ErasedNode, Node};
use crate::provider::Provider;
use crate::recipe::{CombineRecipe, Recipe, SourceRecipe, TransformRecipe};

#[derive(Clone)]
struct Registered {
    erased: Arc<dyn ErasedNode>,
    typed: Arc<dyn Any + Send + Sync>,
}

impl Registered {
    fn of<T: ProviderValue>(node: &Arc<Node<T>>) -> Self {
        Self {
            erased: Arc::clone(node) as Arc<dyn ErasedNode>,
            typed: Arc::clone(node) as Arc<dyn Any + Send + Sync>,
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    nodes: DashMap<ProviderKey, Registered>,
    /// Upstream key -> keys derived from it.
    dependents: DashMap<ProviderKey, BTreeSet<ProviderKey>>,
}

/// Counters describing the registry contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub providers: usize,
    pub edges: usize,
    pub computations: u64,
}

/// Thread-safe owner of the provider graph.
///
/// Cloning the registry is cheap and yields a handle to the same graph.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    inner: Arc<RegistryInner>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root provider computed by `compute`.
    ///
    /// A root only recomputes after [`invalidate`](Self::invalidate) or
    /// [`notify_change`](Self::notify_change) on its key, or after a failure.
    pub fn source<T, F, Fut, E>(&self, key: impl Into<ProviderKey>, compute: F) -> Provider<T>
    where
        T: ProviderValue,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let key = key.into();
        let recipe = SourceRecipe {
            key: key.clone(),
            compute: Arc::new(compute),
        };
        self.provider(key, Box::new(recipe))
    }

    /// Register a provider whose value is `transform(parent value)`.
    pub fn transform<P, T, F, Fut, E>(
        &self,
        parent: &Provider<P>,
        key: impl Into<ProviderKey>,
        transform: F,
    ) -> Provider<T>
    where
        P: ProviderValue,
        T: ProviderValue,
        F: Fn(Arc<P>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let key = key.into();
        let recipe = TransformRecipe {
            key: key.clone(),
            parent: Arc::clone(&parent.node),
            transform: Arc::new(transform),
        };
        self.provider(key, Box::new(recipe))
    }

    /// Register a provider derived from two parents.
    pub fn combine<A, B, T, F, Fut, E>(
        &self,
        first: &Provider<A>,
        second: &Provider<B>,
        key: impl Into<ProviderKey>,
        combine: F,
    ) -> Provider<T>
    where
        A: ProviderValue,
        B: ProviderValue,
        T: ProviderValue,
        F: Fn(Arc<A>, Arc<B>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let key = key.into();
        let recipe = CombineRecipe {
            key: key.clone(),
            first: Arc::clone(&first.node),
            second: Arc::clone(&second.node),
            combine: Arc::new(combine),
        };
        self.provider(key, Box::new(recipe))
    }

    /// Mark `key` stale. Nothing is recomputed until the provider (or one
    /// derived from it) is read again.
    pub fn invalidate(&self, key: &ProviderKey) -> bool {
        match self.erased(key) {
            Some(node) => {
                node.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Mark `key` stale and refresh every subscribed provider downstream of it.
    ///
    /// Each affected provider computes at most once; providers nobody
    /// subscribes to are left to recompute lazily.
    pub async fn notify_change(&self, key: &ProviderKey) {
        let Some(changed) = self.erased(key) else {
            debug!(key = %key, "change notified for unknown provider");
            return;
        };
        changed.mark_dirty();

        let observed: Vec<Arc<dyn ErasedNode>> = self
            .downstream_closure(key)
            .iter()
            .filter_map(|k| self.erased(k))
            .filter(|node| node.has_subscribers())
            .collect();

        debug!(key = %key, refreshed = observed.len(), "propagating provider change");
        join_all(observed.iter().map(|node| {
            trace!(key = %node.key(), "refreshing subscribed provider");
            node.refresh()
        }))
        .await;
    }

    /// Keys directly derived from `key`.
    pub fn dependents_of(&self, key: &ProviderKey) -> Vec<ProviderKey> {
        self.inner
            .dependents
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Keys `key` is directly derived from.
    pub fn upstream_of(&self, key: &ProviderKey) -> Vec<ProviderKey> {
        self.erased(key)
            .map(|node| node.upstream())
            .unwrap_or_default()
    }

    pub fn contains(&self, key: &ProviderKey) -> bool {
        self.inner.nodes.contains_key(key)
    }

    pub fn stats(&self) -> RegistryStats {
        let computations = self
            .inner
            .nodes
            .iter()
            .map(|entry| entry.value().erased.computations())
            .sum();
        RegistryStats {
            providers: self.inner.nodes.len(),
            edges: self.inner.dependents.iter().map(|e| e.value().len()).sum(),
            computations,
        }
    }

    fn provider<T: ProviderValue>(
        &self,
        key: ProviderKey,
        recipe: Box<dyn Recipe<T>>,
    ) -> Provider<T> {
        Provider {
            node: self.register(key, recipe),
            registry: self.clone(),
        }
    }

    /// Return the node already registered under `key`, or register a new one.
    fn register<T: ProviderValue>(
        &self,
        key: ProviderKey,
        recipe: Box<dyn Recipe<T>>,
    ) -> Arc<Node<T>> {
        let node = match self.inner.nodes.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if let Ok(existing) = Arc::clone(&occupied.get().typed).downcast::<Node<T>>() {
                    return existing;
                }
                warn!(key = %key, "provider key re-registered with a different value type");
                let node = Arc::new(Node::new(key.clone(), recipe));
                occupied.insert(Registered::of(&node));
                node
            }
            Entry::Vacant(vacant) => {
                let node = Arc::new(Node::new(key.clone(), recipe));
                vacant.insert(Registered::of(&node));
                node
            }
        };

        for upstream in node.upstream() {
            self.inner
                .dependents
                .entry(upstream)
                .or_default()
                .insert(key.clone());
        }
        debug!(key = %key, "registered provider");
        node
    }

    fn erased(&self, key: &ProviderKey) -> Option<Arc<dyn ErasedNode>> {
        self.inner
            .nodes
            .get(key)
            .map(|entry| Arc::clone(&entry.erased))
    }

    /// `key` followed by every provider transitively derived from it.
    fn downstream_closure(&self, key: &ProviderKey) -> Vec<ProviderKey> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([key.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            queue.extend(self.dependents_of(&current));
            order.push(current);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn constant(registry: &ProviderRegistry, key: &str, value: u32) -> Provider<u32> {
        registry.source(key, move || async move { Ok::<_, Infallible>(value) })
    }

    #[test]
    fn test_register_same_key_returns_same_node() {
        let registry = ProviderRegistry::new();
        let first = constant(&registry, "answer", 42);
        let second = constant(&registry, "answer", 7);

        assert!(Arc::ptr_eq(&first.node, &second.node));
        assert_eq!(registry.stats().providers, 1);
    }

    #[test]
    fn test_type_mismatch_replaces_registration() {
        let registry = ProviderRegistry::new();
        let _numeric = constant(&registry, "value", 1);
        let text: Provider<String> = registry.source("value", || async {
            Ok::<_, Infallible>("one".to_string())
        });

        assert_eq!(text.key().as_str(), "value");
        assert_eq!(registry.stats().providers, 1);
    }

    #[test]
    fn test_edges_and_closure() {
        let registry = ProviderRegistry::new();
        let root = constant(&registry, "root", 1);
        let child = root.transform("child", |v: Arc<u32>| async move {
            Ok::<_, Infallible>(*v + 1)
        });
        let _grandchild = child.transform("grandchild", |v: Arc<u32>| async move {
            Ok::<_, Infallible>(*v * 2)
        });

        let root_key = ProviderKey::from("root");
        assert_eq!(registry.dependents_of(&root_key), vec![ProviderKey::from("child")]);
        assert_eq!(
            registry.upstream_of(&ProviderKey::from("grandchild")),
            vec![ProviderKey::from("child")]
        );
        assert_eq!(
            registry.downstream_closure(&root_key),
            vec![
                ProviderKey::from("root"),
                ProviderKey::from("child"),
                ProviderKey::from("grandchild")
            ]
        );
        assert_eq!(registry.stats().edges, 2);
    }

    #[test]
    fn test_invalidate_unknown_key() {
        let registry = ProviderRegistry::new();
        assert!(!registry.invalidate(&ProviderKey::from("missing")));
        assert!(!registry.contains(&ProviderKey::from("missing")));
    }
}
