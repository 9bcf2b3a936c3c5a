pub mod registry;

pub use registry::{TargetDescriptor, TargetRegistry};

use crate::utils::{AppConfig, ConfigError};
use std::sync::Arc;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<TargetRegistry>,
    pub allowed_extensions: Arc<Vec<String>>,
    pub max_upload_bytes: usize,
    pub service_name: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let registry = TargetRegistry::from_config(&config.targets)?;
        let allowed_extensions = config
            .upload
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        Ok(Self {
            registry: Arc::new(registry),
            allowed_extensions: Arc::new(allowed_extensions),
            max_upload_bytes: config.server.max_upload_bytes,
            service_name: config.server.name.clone(),
        })
    }
}
