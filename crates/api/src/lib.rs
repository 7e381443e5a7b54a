pub mod classroom;
pub mod models;
pub mod translation;

// Re-export commonly used types
pub use classroom::ClassroomService;
pub use models::*;
pub use syllabus_provider::{Provider, ProviderError, ProviderResult, Subscription};
pub use translation::LocaleService;

/// Composite trait for the full catalog surface offered to UI consumers.
pub trait CatalogEngine: ClassroomService + LocaleService {}

impl<T> CatalogEngine for T where T: ClassroomService + LocaleService {}
