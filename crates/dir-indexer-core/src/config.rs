use crate::error::Error;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};

/// Runtime configuration, passed explicitly into the scanner, the mode
/// selector and the storage writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub mode: ModeConfig,
    pub storage: StorageConfig,
    pub browse: BrowseConfig,
    pub statistics: StatisticsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Report progress every N files.
    pub progress_interval: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            progress_interval: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Above this many files the relational store is used unless embedding is forced.
    pub relational_threshold: usize,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            relational_threshold: 200_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Rows per insert batch.
    pub batch_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { batch_size: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub page_size: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self { page_size: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub top_extensions: usize,
    pub largest_files: usize,
    pub recent_files: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            top_extensions: 10,
            largest_files: 50,
            recent_files: 50,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.scan.progress_interval == 0 {
            return Err(Error::InvalidConfig(
                "scan.progress_interval must be greater than zero".to_string(),
            ));
        }
        if self.storage.batch_size == 0 {
            return Err(Error::InvalidConfig(
                "storage.batch_size must be greater than zero".to_string(),
            ));
        }
        if self.browse.page_size == 0 {
            return Err(Error::InvalidConfig(
                "browse.page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from an optional `Config.*` file in the working
/// directory, overridden by `DIR_INDEXER__SECTION__KEY` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("DIR_INDEXER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
