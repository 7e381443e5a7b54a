use std::path::Path;
use std::sync::Arc;

use syllabus_api::CatalogEngine;
use syllabus_core::{CatalogConfig, ClassroomController};

/// Builds a controller reading assets from `config.asset_root` with a fresh
/// provider registry and session.
pub fn build_default_controller(config: CatalogConfig) -> Arc<ClassroomController> {
    Arc::new(ClassroomController::builder(config).build())
}

/// Builds the catalog engine configured from the `SYLLABUS_*` environment.
pub fn build_default_engine() -> syllabus_core::Result<Arc<dyn CatalogEngine>> {
    let config = CatalogConfig::from_env().inspect_err(|e| {
        tracing::error!("Invalid catalog configuration: {}", e);
    })?;
    tracing::info!(
        asset_root = %config.asset_root.display(),
        backend = %config.backend,
        "bootstrapping catalog engine"
    );
    let engine: Arc<dyn CatalogEngine> = build_default_controller(config);
    Ok(engine)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str) -> Option<impl Drop + use<>> {
    init_logging_in(&syllabus_core::logging::default_log_dir(), component)
}

/// Same as [`init_logging`] with an explicit log directory.
pub fn init_logging_in(log_dir: &Path, component: &str) -> Option<impl Drop + use<>> {
    Some(syllabus_core::logging::init_logging_in(
        log_dir, component, false,
    ))
}
