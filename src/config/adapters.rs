// src/config/adapters.rs

use serde::de::DeserializeOwned;
use std::fs;

use crate::bidding::Creative;
use crate::config::config_manager::ServerConfig;
use crate::error::ConfigError;

pub trait ConfigAdapter: Send + Sync {
    fn get_server_config(&self) -> Result<ServerConfig, ConfigError>;
    fn get_catalog(&self) -> Result<Vec<Creative>, ConfigError>;
}

/// 从 JSON 文件读取配置和创意库
pub struct FileConfigAdapter {
    pub server_file: String,
    pub catalog_file: String,
}

impl FileConfigAdapter {
    pub fn new(server_file: &str, catalog_file: &str) -> Self {
        Self {
            server_file: server_file.to_string(),
            catalog_file: catalog_file.to_string(),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_string(),
        source,
    })
}

impl ConfigAdapter for FileConfigAdapter {
    fn get_server_config(&self) -> Result<ServerConfig, ConfigError> {
        read_json(&self.server_file)
    }

    fn get_catalog(&self) -> Result<Vec<Creative>, ConfigError> {
        read_json(&self.catalog_file)
    }
}
