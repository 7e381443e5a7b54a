use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use crate::ProviderValue;
use crate::error::{ProviderError, ProviderResult};
use crate::key::ProviderKey;
use crate::recipe::Recipe;

pub(crate) type Callback<T> = Arc<dyn Fn(ProviderResult<T>) + Send + Sync>;

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
    /// Last value version handed to this subscriber.
    seen: Option<u64>,
}

struct Slot<T> {
    value: Option<Arc<T>>,
    /// Bumped only when a computation yields a value unequal to the previous one.
    version: u64,
    /// Upstream versions the cached value was computed from.
    inputs: Vec<u64>,
    failed: bool,
}

/// One entry of the provider graph.
pub(crate) struct Node<T> {
    key: ProviderKey,
    recipe: Box<dyn Recipe<T>>,
    /// Held for the whole freshness check and computation: this is the
    /// single-flight guarantee.
    slot: tokio::sync::Mutex<Slot<T>>,
    dirty: AtomicBool,
    subscribers: Mutex<Vec<Subscriber<T>>>,
    next_subscriber: AtomicU64,
    computations: AtomicU64,
}

impl<T: ProviderValue> Node<T> {
    pub(crate) fn new(key: ProviderKey, recipe: Box<dyn Recipe<T>>) -> Self {
        Self {
            key,
            recipe,
            slot: tokio::sync::Mutex::new(Slot {
                value: None,
                version: 0,
                inputs: Vec::new(),
                failed: false,
            }),
            dirty: AtomicBool::new(false),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber: AtomicU64::new(1),
            computations: AtomicU64::new(0),
        }
    }

    pub(crate) fn key(&self) -> &ProviderKey {
        &self.key
    }

    pub(crate) fn upstream(&self) -> Vec<ProviderKey> {
        self.recipe.upstream()
    }

    pub(crate) fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Returns the up-to-date value and its version, computing it if needed.
    ///
    /// Subscribers that have not yet seen the returned version (or that must
    /// learn about a failure) are notified before the slot is released.
    pub(crate) async fn current(&self) -> Result<(Arc<T>, u64), ProviderError> {
        let mut slot = self.slot.lock().await;
        let outcome = self.ensure_fresh(&mut slot).await;
        self.deliver(&outcome);
        outcome
    }

    async fn ensure_fresh(&self, slot: &mut Slot<T>) -> Result<(Arc<T>, u64), ProviderError> {
        let prepared = match self.recipe.prepare().await {
            Ok(prepared) => prepared,
            Err(err) => {
                slot.failed = true;
                return Err(err);
            }
        };

        if let Some(value) = &slot.value {
            if !slot.failed && !self.dirty.load(Ordering::Acquire) && slot.inputs == prepared.inputs
            {
                trace!(key = %self.key, version = slot.version, "provider cache hit");
                return Ok((Arc::clone(value), slot.version));
            }
        }

        // Cleared before running so a change notified mid-computation is not lost.
        self.dirty.store(false, Ordering::Release);
        self.computations.fetch_add(1, Ordering::Relaxed);
        debug!(key = %self.key, "computing provider");

        match prepared.run.await {
            Ok(computed) => {
                slot.failed = false;
                slot.inputs = prepared.inputs;
                let value = match slot.value.take() {
                    Some(previous) if *previous == computed => previous,
                    _ => {
                        slot.version += 1;
                        Arc::new(computed)
                    }
                };
                slot.value = Some(Arc::clone(&value));
                Ok((value, slot.version))
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "provider computation failed");
                slot.failed = true;
                Err(err)
            }
        }
    }

    fn deliver(&self, outcome: &Result<(Arc<T>, u64), ProviderError>) {
        let pending: Vec<(Callback<T>, ProviderResult<T>)> = {
            let mut subscribers = self.lock_subscribers();
            match outcome {
                Ok((value, version)) => subscribers
                    .iter_mut()
                    .filter(|s| s.seen != Some(*version))
                    .map(|s| {
                        s.seen = Some(*version);
                        (Arc::clone(&s.callback), Ok(Arc::clone(value)))
                    })
                    .collect(),
                Err(err) => subscribers
                    .iter_mut()
                    .map(|s| {
                        s.seen = None;
                        (Arc::clone(&s.callback), Err(err.clone()))
                    })
                    .collect(),
            }
        };

        for (callback, result) in pending {
            callback(result);
        }
    }

    pub(crate) fn attach(&self, callback: Callback<T>) -> u64 {
        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.lock_subscribers().push(Subscriber {
            id,
            callback,
            seen: None,
        });
        id
    }

    pub(crate) fn detach(&self, id: u64) -> bool {
        let mut subscribers = self.lock_subscribers();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Subscriber<T>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Type-erased view used by the registry to walk and refresh the graph.
#[async_trait]
pub(crate) trait ErasedNode: Send + Sync {
    fn key(&self) -> &ProviderKey;
    fn upstream(&self) -> Vec<ProviderKey>;
    fn mark_dirty(&self);
    fn has_subscribers(&self) -> bool;
    fn computations(&self) -> u64;
    async fn refresh(&self);
}

#[async_trait]
impl<T: ProviderValue> ErasedNode for Node<T> {
    fn key(&self) -> &ProviderKey {
        &self.key
    }

    fn upstream(&self) -> Vec<ProviderKey> {
        Node::upstream(self)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    fn has_subscribers(&self) -> bool {
        !self.lock_subscribers().is_empty()
    }

    fn computations(&self) -> u64 {
        Node::computations(self)
    }

    async fn refresh(&self) {
        // Failures were already delivered to the subscribers.
        let _ = self.current().await;
    }
}
