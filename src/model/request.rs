// src/model/request.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::format::{Format, FormatType};
use crate::model::zone::Zone;

/// 单次请求的 HTTP 上下文快照，构造后只读，按值随请求传递
#[derive(Serialize, Debug, Clone, Default)]
pub struct HttpContext {
    pub method: String,
    pub uri: String,
    pub query: String,
    #[serde(skip)]
    pub params: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub ip: String,
}

impl HttpContext {
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn has_query(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// 一个待填充的广告展示位
#[derive(Debug, Clone, Default)]
pub struct Impression {
    pub id: String,
    pub target: Option<Arc<Zone>>,
    pub format_types: Vec<FormatType>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl Impression {
    pub fn new(id: &str, target: Option<Arc<Zone>>) -> Self {
        Self {
            id: id.to_string(),
            target,
            format_types: Vec::new(),
            width: None,
            height: None,
        }
    }

    pub fn target_id(&self) -> u64 {
        self.target.as_ref().map(|z| z.id).unwrap_or(0)
    }

    pub fn alternative_ad_code(&self, channel: &str) -> Option<&str> {
        self.target.as_ref()?.alternative_ad_code(channel)
    }

    pub fn allows(&self, format: &Format) -> bool {
        let type_ok = self.format_types.is_empty() || self.format_types.contains(&format.kind);
        let zone_ok = self
            .target
            .as_ref()
            .map(|z| z.allows_format(&format.codename))
            .unwrap_or(true);
        type_ok && zone_ok
    }
}

/// 竞价请求，由 api 层构造，渲染引擎只读
#[derive(Debug, Clone, Default)]
pub struct BidRequest {
    pub id: String,
    pub auction_id: String,
    pub debug: bool,
    pub robot: bool,
    pub impressions: Vec<Impression>,
    pub formats: Vec<Format>,
    pub service_domain: String,
    pub http: HttpContext,
}

impl BidRequest {
    pub fn impression(&self, id: &str) -> Option<&Impression> {
        self.impressions.iter().find(|imp| imp.id == id)
    }

    /// 第一个展示位的 zone ID
    pub fn target_id(&self) -> u64 {
        self.impressions.first().map(Impression::target_id).unwrap_or(0)
    }

    pub fn with_formats(mut self, formats: Vec<Format>) -> Self {
        self.formats = formats;
        self
    }

    /// 对每个展示位执行更新
    pub fn update_impressions<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Impression),
    {
        self.impressions.iter_mut().for_each(|imp| f(imp));
    }

    /// debug 模式下带 noredirect 参数时只输出调试信息
    pub fn is_no_redirect_trace(&self) -> bool {
        self.debug && self.http.has_query("noredirect")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> Arc<Zone> {
        Arc::new(Zone {
            id: 42,
            codename: "z42".into(),
            formats: vec!["banner_300x250".into()],
            ..Default::default()
        })
    }

    #[test]
    fn impression_without_target_has_zero_id() {
        let imp = Impression::new("imp-1", None);
        assert_eq!(imp.target_id(), 0);
        assert_eq!(imp.alternative_ad_code("direct"), None);
    }

    #[test]
    fn allows_checks_type_and_zone() {
        let mut imp = Impression::new("imp-1", Some(zone()));
        let banner = Format::new("banner_300x250", FormatType::Banner);
        let other = Format::new("banner_728x90", FormatType::Banner);
        assert!(imp.allows(&banner));
        assert!(!imp.allows(&other));

        imp.format_types = vec![FormatType::Direct];
        assert!(!imp.allows(&banner));
    }

    #[test]
    fn no_redirect_trace_requires_debug() {
        let mut req = BidRequest::default();
        req.http.params.insert("noredirect".into(), String::new());
        assert!(!req.is_no_redirect_trace());
        req.debug = true;
        assert!(req.is_no_redirect_trace());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut http = HttpContext::default();
        http.headers.insert("user-agent".into(), "curl/8".into());
        assert_eq!(http.header("User-Agent"), Some("curl/8"));
    }
}
