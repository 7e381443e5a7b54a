//! Catalog resolution engine: reads classroom and topic assets, localizes
//! them per caller and serves the results through reactive providers.

pub mod asset;
pub mod catalog;
pub mod config;
pub mod error;
pub mod locale;
pub mod logging;
pub mod session;
pub mod translation;

pub use catalog::{ClassroomController, ClassroomControllerBuilder};
pub use config::{BackendMode, CatalogConfig};
pub use error::{CatalogError, Result};
pub use locale::LocaleResolver;
pub use session::SessionContext;
