// src/config/config_manager.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::endpoints::dynamic::assets::AssetDedupPolicy;
use crate::model::{Format, Zone};

/// 信息披露链接配置，为空的链接不输出
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MetaConfig {
    pub report_url: String,
    pub about_url: String,
    pub hide_url: String,
}

/// 服务配置（static/server.json）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub service_domain: String,
    pub superfailover_url: String,
    pub tracker_base_url: String,
    pub click_base_url: String,
    pub cdn_base_url: String,
    pub lib_base_url: String,
    pub allow_debug: bool,
    pub asset_dedup: AssetDedupPolicy,
    pub meta: MetaConfig,
    pub formats: Vec<Format>,
    pub zones: Vec<Zone>,
    pub event_buffer_size: usize,
    pub event_batch_size: usize,
    pub event_flush_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            service_domain: String::new(),
            superfailover_url: String::new(),
            tracker_base_url: String::new(),
            click_base_url: String::new(),
            cdn_base_url: String::new(),
            lib_base_url: String::new(),
            allow_debug: false,
            asset_dedup: AssetDedupPolicy::default(),
            meta: MetaConfig::default(),
            formats: Vec::new(),
            zones: Vec::new(),
            event_buffer_size: 1024,
            event_batch_size: 100,
            event_flush_interval_ms: 1000,
        }
    }
}

/// 只读配置，启动时构造一次，通过 Arc 在请求间共享
#[derive(Debug, Clone)]
pub struct ConfigManager {
    server: ServerConfig,
    zones: HashMap<u64, Arc<Zone>>,
}

impl ConfigManager {
    pub fn new(server: ServerConfig) -> Self {
        let zones = server
            .zones
            .iter()
            .map(|z| (z.id, Arc::new(z.clone())))
            .collect();
        ConfigManager { server, zones }
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub fn zone(&self, id: u64) -> Option<Arc<Zone>> {
        self.zones.get(&id).cloned()
    }

    pub fn formats(&self) -> &[Format] {
        &self.server.formats
    }

    pub fn direct_formats(&self) -> Vec<Format> {
        self.server
            .formats
            .iter()
            .filter(|f| f.is_direct())
            .cloned()
            .collect()
    }
}
