// src/model/response.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::TryFrom;
use std::slice;
use std::sync::Arc;

use crate::error::{BidError, RenderError};
use crate::model::format::Format;
use crate::model::request::{BidRequest, Impression};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum AssetType {
    #[default]
    Undefined = 0,
    Image = 1,
    Video = 2,
    Html5 = 3,
}

impl TryFrom<u8> for AssetType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AssetType::Undefined),
            1 => Ok(AssetType::Image),
            2 => Ok(AssetType::Video),
            3 => Ok(AssetType::Html5),
            _ => Err(format!("Invalid value for AssetType: {}", value)),
        }
    }
}

impl From<AssetType> for u8 {
    fn from(t: AssetType) -> Self {
        t as u8
    }
}

impl AssetType {
    /// 输出给客户端的类型代码，Undefined 为空串
    pub fn code(&self) -> &'static str {
        match self {
            AssetType::Undefined => "",
            AssetType::Image => "image",
            AssetType::Video => "video",
            AssetType::Html5 => "html5",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AssetThumb {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: AssetType,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

/// 创意素材
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Asset {
    pub name: String,
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: AssetType,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub thumbs: Vec<AssetThumb>,
}

/// 单个获胜创意，绑定到一个展示位
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResponseItem {
    pub id: String,
    pub ad_id: String,
    pub impression_id: String,
    #[serde(default)]
    pub zone_id: u64,
    pub format: Format,
    #[serde(default)]
    pub action_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub click_trackers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub view_trackers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub impression_trackers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertiser: Option<String>,
}

impl ResponseItem {
    /// 无获胜广告时用于生成自定义追踪像素的空白条目
    pub fn blank(impression: Option<&Impression>, format: Format) -> Self {
        Self {
            impression_id: impression.map(|imp| imp.id.clone()).unwrap_or_default(),
            zone_id: impression.map(Impression::target_id).unwrap_or(0),
            format,
            ..Default::default()
        }
    }

    pub fn is_direct(&self) -> bool {
        self.format.is_direct()
    }
}

/// 共享同一展示位的一组创意，仅 dynamic 协议允许
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResponseMultipleItem {
    pub impression_id: String,
    pub items: Vec<ResponseItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ad {
    Item(ResponseItem),
    Bundle(ResponseMultipleItem),
}

impl Ad {
    pub fn is_bundle(&self) -> bool {
        matches!(self, Ad::Bundle(_))
    }

    pub fn items(&self) -> &[ResponseItem] {
        match self {
            Ad::Item(item) => slice::from_ref(item),
            Ad::Bundle(bundle) => &bundle.items,
        }
    }

    pub fn impression_id(&self) -> &str {
        match self {
            Ad::Item(item) => &item.impression_id,
            Ad::Bundle(bundle) => &bundle.impression_id,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Ad::Item(item) => &item.id,
            Ad::Bundle(bundle) => bundle.items.first().map(|i| i.id.as_str()).unwrap_or(""),
        }
    }
}

impl From<ResponseItem> for Ad {
    fn from(item: ResponseItem) -> Self {
        Ad::Item(item)
    }
}

/// 一次竞价的结果
#[derive(Debug, Clone)]
pub struct BidResponse {
    pub request: Arc<BidRequest>,
    pub ads: Vec<Ad>,
    pub error: Option<BidError>,
}

impl BidResponse {
    pub fn new(request: Arc<BidRequest>, ads: Vec<Ad>) -> Self {
        Self {
            request,
            ads,
            error: None,
        }
    }

    pub fn empty(request: Arc<BidRequest>) -> Self {
        Self::new(request, Vec::new())
    }

    pub fn with_error(request: Arc<BidRequest>, error: BidError) -> Self {
        Self {
            request,
            ads: Vec::new(),
            error: Some(error),
        }
    }

    pub fn count(&self) -> usize {
        self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    /// 每个广告必须指向请求中存在的展示位，组合广告内的条目必须属于同一展示位
    pub fn validate(&self) -> Result<(), RenderError> {
        for ad in &self.ads {
            if self.request.impression(ad.impression_id()).is_none() {
                return Err(RenderError::UnknownImpression {
                    ad: ad.id().to_string(),
                    impression: ad.impression_id().to_string(),
                });
            }
            if let Some(item) = ad.items().iter().find(|item| item.impression_id != ad.impression_id()) {
                return Err(RenderError::BundleImpressionMismatch {
                    bundle: ad.impression_id().to_string(),
                    item: item.id.clone(),
                    impression: item.impression_id.clone(),
                });
            }
        }
        Ok(())
    }
}
