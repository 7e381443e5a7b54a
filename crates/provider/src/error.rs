use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

use crate::key::ProviderKey;

/// Failure reported by a provider read or delivered to its subscribers.
///
/// The error is cheap to clone so one failure can fan out to every attached
/// subscriber. The original cause is kept and can be recovered with
/// [`ProviderError::cause_as`].
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider '{key}' failed: {cause}")]
    Computation {
        key: ProviderKey,
        cause: Arc<dyn Error + Send + Sync>,
    },
}

impl ProviderError {
    pub fn computation<E>(key: &ProviderKey, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        ProviderError::Computation {
            key: key.clone(),
            cause: Arc::new(cause),
        }
    }

    /// Key of the provider whose computation failed.
    ///
    /// For a derived provider whose upstream failed this is the upstream key.
    pub fn key(&self) -> &ProviderKey {
        match self {
            ProviderError::Computation { key, .. } => key,
        }
    }

    /// Downcast the underlying cause to a concrete error type.
    pub fn cause_as<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        match self {
            ProviderError::Computation { cause, .. } => cause.downcast_ref::<E>(),
        }
    }
}

pub type ProviderResult<T> = std::result::Result<Arc<T>, ProviderError>;
