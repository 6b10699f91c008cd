// src/endpoints/dynamic/response.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 追踪像素集合
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Tracker {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clicks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub impressions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<String>,
}

impl Tracker {
    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty() && self.impressions.is_empty() && self.views.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AssetThumb {
    pub path: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub path: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbs: Vec<AssetThumb>,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetaLink {
    pub title: String,
    pub url: String,
}

/// 广告主 / 广告信息披露
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MetaInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertiser: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, MetaLink>,
}

impl MetaInfo {
    pub fn is_empty(&self) -> bool {
        self.advertiser.is_none() && self.links.is_empty()
    }
}

/// 输出给客户端的单个广告条目
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub tracker: Tracker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

/// 按展示位聚合的条目组
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub id: String,
    /// 仅在组内没有条目时填充
    #[serde(default, skip_serializing_if = "Tracker::is_empty")]
    pub custom_tracker: Tracker,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Group {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn add_item(&mut self, item: Item) -> &mut Self {
        self.items.push(item);
        self
    }
}

/// dynamic 协议响应文档
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub version: String,
    #[serde(default, skip_serializing_if = "Tracker::is_empty")]
    pub custom_tracker: Tracker,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

impl Response {
    pub fn new(custom_tracker: Tracker) -> Self {
        Self {
            version: "1".to_string(),
            custom_tracker,
            groups: Vec::new(),
            debug: None,
        }
    }

    /// 按 ID 线性查找组，不存在时追加，保持首次出现顺序
    pub fn group_or_create(&mut self, group_id: &str) -> &mut Group {
        let idx = match self.groups.iter().position(|g| g.id == group_id) {
            Some(idx) => idx,
            None => {
                self.groups.push(Group::new(group_id));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_or_create_is_idempotent_and_ordered() {
        let mut resp = Response::new(Tracker::default());
        resp.group_or_create("b");
        resp.group_or_create("a");
        resp.group_or_create("b").add_item(Item::default());

        let ids: Vec<&str> = resp.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(resp.groups[0].items.len(), 1);
        assert_eq!(resp.item_count(), 1);
    }

    #[test]
    fn empty_blocks_are_omitted() {
        let mut resp = Response::new(Tracker::default());
        resp.group_or_create("imp-1");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["version"], "1");
        assert!(json.get("custom_tracker").is_none());
        assert!(json["groups"][0].get("custom_tracker").is_none());
        assert_eq!(json["groups"][0]["items"], serde_json::json!([]));
    }

    #[test]
    fn item_always_has_tracker_key() {
        let json = serde_json::to_value(Item {
            id: "x".into(),
            kind: "banner".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["tracker"], serde_json::json!({}));
        assert!(json.get("meta").is_none());
        assert!(json.get("debug").is_none());
    }
}
