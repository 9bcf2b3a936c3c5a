pub mod csv_processor;
pub mod import;
pub mod server;
pub mod state;
pub mod utils;

pub use csv_processor::{CsvUpload, EffectiveColumnMap, ParsedCsv, Record};
pub use import::{run_import, ImportRequest, MappingInput};
pub use server::{router, ImportResponse};
pub use state::{AppState, TargetDescriptor, TargetRegistry};
pub use utils::{AppConfig, ConfigError, ImportError, Result};
