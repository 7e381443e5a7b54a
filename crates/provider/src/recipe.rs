//! How a node obtains its inputs and computes its value.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, try_join};

use crate::ProviderValue;
use crate::error::ProviderError;
use crate::key::ProviderKey;
use crate::node::Node;

/// Upstream state captured before deciding whether to recompute.
pub(crate) struct Prepared<T> {
    /// Versions of the upstream values the computation would consume.
    pub inputs: Vec<u64>,
    /// The computation itself. Not polled on a cache hit.
    pub run: BoxFuture<'static, Result<T, ProviderError>>,
}

#[async_trait]
pub(crate) trait Recipe<T>: Send + Sync {
    fn upstream(&self) -> Vec<ProviderKey>;

    /// Bring upstream providers up to date and stage the computation.
    async fn prepare(&self) -> Result<Prepared<T>, ProviderError>;
}

pub(crate) struct SourceRecipe<F> {
    pub key: ProviderKey,
    pub compute: Arc<F>,
}

#[async_trait]
impl<T, F, Fut, E> Recipe<T> for SourceRecipe<F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    fn upstream(&self) -> Vec<ProviderKey> {
        Vec::new()
    }

    async fn prepare(&self) -> Result<Prepared<T>, ProviderError> {
        let key = self.key.clone();
        let compute = Arc::clone(&self.compute);
        Ok(Prepared {
            inputs: Vec::new(),
            run: async move {
                (*compute)()
                    .await
                    .map_err(|e| ProviderError::computation(&key, e))
            }
            .boxed(),
        })
    }
}

pub(crate) struct TransformRecipe<P, F> {
    pub key: ProviderKey,
    pub parent: Arc<Node<P>>,
    pub transform: Arc<F>,
}

#[async_trait]
impl<P, T, F, Fut, E> Recipe<T> for TransformRecipe<P, F>
where
    P: ProviderValue,
    T: Send + 'static,
    F: Fn(Arc<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    fn upstream(&self) -> Vec<ProviderKey> {
        vec![self.parent.key().clone()]
    }

    async fn prepare(&self) -> Result<Prepared<T>, ProviderError> {
        let (value, version) = self.parent.current().await?;
        let key = self.key.clone();
        let transform = Arc::clone(&self.transform);
        Ok(Prepared {
            inputs: vec![version],
            run: async move {
                (*transform)(value)
                    .await
                    .map_err(|e| ProviderError::computation(&key, e))
            }
            .boxed(),
        })
    }
}

pub(crate) struct CombineRecipe<A, B, F> {
    pub key: ProviderKey,
    pub first: Arc<Node<A>>,
    pub second: Arc<Node<B>>,
    pub combine: Arc<F>,
}

#[async_trait]
impl<A, B, T, F, Fut, E> Recipe<T> for CombineRecipe<A, B, F>
where
    A: ProviderValue,
    B: ProviderValue,
    T: Send + 'static,
    F: Fn(Arc<A>, Arc<B>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    fn upstream(&self) -> Vec<ProviderKey> {
        vec![self.first.key().clone(), self.second.key().clone()]
    }

    async fn prepare(&self) -> Result<Prepared<T>, ProviderError> {
        let ((a, a_version), (b, b_version)) =
            try_join(self.first.current(), self.second.current()).await?;
        let key = self.key.clone();
        let combine = Arc::clone(&self.combine);
        Ok(Prepared {
            inputs: vec![a_version, b_version],
            run: async move {
                (*combine)(a, b)
                    .await
                    .map_err(|e| ProviderError::computation(&key, e))
            }
            .boxed(),
        })
    }
}
