// src/model/zone.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 广告位（Zone）配置
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Zone {
    pub id: u64,
    #[serde(default)]
    pub codename: String,
    /// 允许的格式 codename，为空表示不限制
    #[serde(default)]
    pub formats: Vec<String>,
    /// 无广告时的备用代码/链接，按渠道名（如 "direct"）索引
    #[serde(default)]
    pub alternative_ad_codes: HashMap<String, String>,
}

impl Zone {
    /// 获取渠道对应的备用链接，空字符串视为不存在
    pub fn alternative_ad_code(&self, channel: &str) -> Option<&str> {
        self.alternative_ad_codes
            .get(channel)
            .map(String::as_str)
            .filter(|code| !code.is_empty())
    }

    pub fn allows_format(&self, codename: &str) -> bool {
        self.formats.is_empty() || self.formats.iter().any(|f| f == codename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_alternative_code_is_ignored() {
        let mut zone = Zone::default();
        zone.alternative_ad_codes.insert("direct".into(), String::new());
        assert_eq!(zone.alternative_ad_code("direct"), None);

        zone.alternative_ad_codes
            .insert("direct".into(), "https://adv.example/x".into());
        assert_eq!(zone.alternative_ad_code("direct"), Some("https://adv.example/x"));
        assert_eq!(zone.alternative_ad_code("dynamic"), None);
    }

    #[test]
    fn empty_format_list_allows_everything() {
        let mut zone = Zone::default();
        assert!(zone.allows_format("banner"));
        zone.formats = vec!["direct".into()];
        assert!(zone.allows_format("direct"));
        assert!(!zone.allows_format("banner"));
    }
}
