//! Reactive, memoized data providers.
//!
//! A provider is a cached computation identified by a stable [`ProviderKey`].
//! Providers form a directed acyclic graph: roots are created with
//! [`ProviderRegistry::source`], derived providers with
//! [`ProviderRegistry::transform`] and [`ProviderRegistry::combine`].
//!
//! - Each key has at most one computation in flight; concurrent readers attach
//!   to it instead of starting another.
//! - A derived provider recomputes only when an upstream value changed by
//!   equality, never merely because it was read again.
//! - Subscribers are told about every new value version and every failure.
//! - Failures are not sticky: the next read retries the computation.

pub mod error;
pub mod key;
mod node;
pub mod provider;
mod recipe;
pub mod registry;

pub use error::{ProviderError, ProviderResult};
pub use key::ProviderKey;
pub use provider::{Provider, Subscription};
pub use registry::{ProviderRegistry, RegistryStats};

/// Bound required from every value stored in a provider.
///
/// `PartialEq` is what lets the registry decide whether a recomputation
/// actually produced something new.
pub trait ProviderValue: PartialEq + Send + Sync + 'static {}

impl<T> ProviderValue for T where T: PartialEq + Send + Sync + 'static {}
