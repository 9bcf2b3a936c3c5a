pub mod config;
pub mod errors;

pub use config::{
    AppConfig, LoggingConfig, ServerConfig, TargetConfig, UploadConfig, DEFAULT_CONFIG_PATH,
};
pub use errors::{ConfigError, ImportError, Result};

/// Extension of an uploaded file name, lower-cased, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
