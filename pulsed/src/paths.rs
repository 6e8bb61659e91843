//! Cross-platform config location
//!
//! - Linux: ~/.config/pulsenet/
//! - Windows: %APPDATA%\pulsenet\
//! - MacOS: ~/Library/Application Support/pulsenet/

use std::path::{Path, PathBuf};

use crate::error::DriverError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, DriverError> {
        let base = dirs::config_dir().ok_or(DriverError::NoConfigDir)?;
        Ok(Self::with_base(&base))
    }

    pub fn with_base(base: &Path) -> Self {
        Self {
            config_dir: base.join("pulsenet"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}
