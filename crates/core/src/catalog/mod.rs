//! Catalog resolution: backends, the stateless resolver and the
//! provider-backed controller callers talk to.

pub mod backend;
pub mod controller;
pub mod document;
pub mod record;
pub mod resolver;

pub use backend::{CLASSROOM_INDEX, CatalogBackend, ClassroomEntry, TopicEntry, select_backend};
pub use controller::{ClassroomController, ClassroomControllerBuilder};
pub use document::DocumentBackend;
pub use record::RecordBackend;
pub use resolver::CatalogResolver;
