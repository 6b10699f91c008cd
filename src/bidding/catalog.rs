// src/bidding/catalog.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Asset, Format, Impression, ResponseItem};

/// 创意库中的一条创意
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Creative {
    pub id: String,
    /// 格式 codename，对应配置中的 formats
    pub format: String,
    #[serde(default)]
    pub action_url: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub click_trackers: Vec<String>,
    #[serde(default)]
    pub view_trackers: Vec<String>,
    #[serde(default)]
    pub impression_trackers: Vec<String>,
    #[serde(default)]
    pub advertiser: Option<String>,
}

impl Creative {
    /// 绑定到展示位，生成响应条目
    pub fn to_item(&self, bid_id: &str, impression: &Impression, format: &Format) -> ResponseItem {
        ResponseItem {
            id: bid_id.to_string(),
            ad_id: self.id.clone(),
            impression_id: impression.id.clone(),
            zone_id: impression.target_id(),
            format: format.clone(),
            action_url: self.action_url.clone(),
            content: self.content.clone(),
            content_url: self.content_url.clone(),
            fields: self.fields.clone(),
            assets: self.assets.clone(),
            click_trackers: self.click_trackers.clone(),
            view_trackers: self.view_trackers.clone(),
            impression_trackers: self.impression_trackers.clone(),
            advertiser: self.advertiser.clone(),
        }
    }
}
