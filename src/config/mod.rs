pub mod validation;

pub use validation::{validate_config, AppConfig, ExportConfig};
