use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{LedgerError, Result};
use crate::pnl::Method;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub method: Method,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field delimiter, a single ASCII character
    pub delimiter: char,
    /// File name prefix for artifact exports
    pub file_prefix: String,
    /// Where artifacts are created; system temp dir when unset
    pub directory: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            file_prefix: "lot-export".to_string(),
            directory: None,
        }
    }
}

impl ExportConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter {
            '"' | '\r' | '\n' => Err(LedgerError::InvalidConfig(format!(
                "Delimiter {:?} cannot be used as a field separator",
                self.delimiter
            ))),
            c if c.is_ascii() => Ok(c as u8),
            c => Err(LedgerError::InvalidConfig(format!(
                "Delimiter must be a single ASCII character, got {:?}",
                c
            ))),
        }
    }
}

impl AppConfig {
    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        validate_config(&config)?;
        Ok(config)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
    config.export.delimiter_byte()?;

    if config.export.file_prefix.trim().is_empty() {
        return Err(LedgerError::InvalidConfig(
            "File prefix must not be empty".to_string()
        ));
    }

    if config.export.file_prefix.contains(['/', '\\']) {
        return Err(LedgerError::InvalidConfig(
            format!("File prefix must not contain path separators, got {:?}", config.export.file_prefix)
        ));
    }

    if let Some(directory) = &config.export.directory {
        if !directory.is_dir() {
            return Err(LedgerError::InvalidConfig(
                format!("Export directory {:?} does not exist or is not a directory", directory)
            ));
        }
    }

    Ok(())
}
