// src/urlgen.rs

use url::form_urlencoded;

use crate::error::UrlError;
use crate::model::{BidResponse, EventStatus, EventType, ResponseItem};

/// 点击 / 像素 / CDN 链接生成器，需支持并发调用
pub trait UrlGenerator: Send + Sync {
    fn click_url(&self, item: &ResponseItem, response: &BidResponse) -> Result<String, UrlError>;

    fn pixel_url(
        &self,
        event: EventType,
        status: EventStatus,
        item: &ResponseItem,
        response: &BidResponse,
        js: bool,
    ) -> Result<String, UrlError>;

    fn cdn_url(&self, path: &str) -> String;

    fn lib_url(&self, path: &str) -> String;
}

/// 基于固定前缀拼接查询串的默认实现
#[derive(Debug, Clone, Default)]
pub struct TemplateUrlGenerator {
    pub tracker_base: String,
    pub click_base: String,
    pub cdn_base: String,
    pub lib_base: String,
}

impl TemplateUrlGenerator {
    pub fn new(tracker_base: &str, click_base: &str, cdn_base: &str, lib_base: &str) -> Self {
        Self {
            tracker_base: tracker_base.trim_end_matches('/').to_string(),
            click_base: click_base.trim_end_matches('/').to_string(),
            cdn_base: cdn_base.trim_end_matches('/').to_string(),
            lib_base: lib_base.trim_end_matches('/').to_string(),
        }
    }

    fn base_query(item: &ResponseItem, response: &BidResponse) -> form_urlencoded::Serializer<'static, String> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("a", &response.request.auction_id)
            .append_pair("imp", &item.impression_id)
            .append_pair("ad", &item.ad_id)
            .append_pair("z", &item.zone_id.to_string())
            .append_pair("f", &item.format.codename);
        query
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("//") || path.contains("://")
}

fn join(base: &str, path: &str) -> String {
    if base.is_empty() || path.is_empty() || is_absolute(path) {
        return path.to_string();
    }
    format!("{}/{}", base, path.trim_start_matches('/'))
}

impl UrlGenerator for TemplateUrlGenerator {
    fn click_url(&self, item: &ResponseItem, response: &BidResponse) -> Result<String, UrlError> {
        if self.click_base.is_empty() {
            return Err(UrlError::MissingBase("click"));
        }
        if item.action_url.is_empty() {
            return Err(UrlError::EmptyActionUrl(item.id.clone()));
        }
        let mut query = Self::base_query(item, response);
        query.append_pair("u", &prepare_url(&item.action_url, response, item));
        Ok(format!("{}/c?{}", self.click_base, query.finish()))
    }

    fn pixel_url(
        &self,
        event: EventType,
        status: EventStatus,
        item: &ResponseItem,
        response: &BidResponse,
        js: bool,
    ) -> Result<String, UrlError> {
        if self.tracker_base.is_empty() {
            return Err(UrlError::MissingBase("tracker"));
        }
        let mut query = Self::base_query(item, response);
        query
            .append_pair("e", event.code())
            .append_pair("s", &status.code().to_string());
        let ext = if js { "js" } else { "gif" };
        Ok(format!("{}/t/px.{}?{}", self.tracker_base, ext, query.finish()))
    }

    fn cdn_url(&self, path: &str) -> String {
        join(&self.cdn_base, path)
    }

    fn lib_url(&self, path: &str) -> String {
        join(&self.lib_base, path)
    }
}

/// 替换落地页链接中的宏
pub fn prepare_url(url: &str, response: &BidResponse, item: &ResponseItem) -> String {
    if !url.contains('{') {
        return url.to_string();
    }
    let request = &response.request;
    [
        ("{id}", item.id.as_str()),
        ("{adid}", item.ad_id.as_str()),
        ("{impid}", item.impression_id.as_str()),
        ("{auctionid}", request.auction_id.as_str()),
        ("{requestid}", request.id.as_str()),
    ]
    .iter()
    .fold(url.to_string(), |acc, (macro_name, value)| acc.replace(macro_name, value))
    .replace("{zoneid}", &item.zone_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BidRequest, Format, FormatType};
    use std::sync::Arc;

    fn response() -> BidResponse {
        BidResponse::empty(Arc::new(BidRequest {
            id: "req-1".into(),
            auction_id: "auc-1".into(),
            ..Default::default()
        }))
    }

    fn item() -> ResponseItem {
        ResponseItem {
            id: "bid-1".into(),
            ad_id: "ad-7".into(),
            impression_id: "imp-1".into(),
            zone_id: 42,
            format: Format::new("dl", FormatType::Direct),
            action_url: "https://adv.example/land?a={adid}&z={zoneid}&x={auctionid}".into(),
            ..Default::default()
        }
    }

    fn generator() -> TemplateUrlGenerator {
        TemplateUrlGenerator::new("//t.example", "//c.example/", "https://cdn.example", "//lib.example")
    }

    #[test]
    fn prepare_url_replaces_macros() {
        assert_eq!(
            prepare_url(&item().action_url, &response(), &item()),
            "https://adv.example/land?a=ad-7&z=42&x=auc-1"
        );
        assert_eq!(prepare_url("https://plain", &response(), &item()), "https://plain");
    }

    #[test]
    fn pixel_url_carries_event_and_status() {
        let url = generator()
            .pixel_url(EventType::View, EventStatus::Custom, &item(), &response(), false)
            .unwrap();
        assert!(url.starts_with("//t.example/t/px.gif?"));
        assert!(url.contains("e=view"));
        assert!(url.contains("s=2"));
        assert!(url.contains("imp=imp-1"));

        let js = generator()
            .pixel_url(EventType::Impression, EventStatus::Success, &item(), &response(), true)
            .unwrap();
        assert!(js.starts_with("//t.example/t/px.js?"));
    }

    #[test]
    fn click_url_embeds_prepared_target() {
        let url = generator().click_url(&item(), &response()).unwrap();
        assert!(url.starts_with("//c.example/c?"));
        assert!(url.contains("u=https%3A%2F%2Fadv.example%2Fland%3Fa%3Dad-7"));
    }

    #[test]
    fn missing_bases_are_errors() {
        let gen = TemplateUrlGenerator::default();
        assert!(gen.click_url(&item(), &response()).is_err());
        assert!(gen
            .pixel_url(EventType::Click, EventStatus::Custom, &item(), &response(), false)
            .is_err());
    }

    #[test]
    fn cdn_url_passes_absolute_paths_through() {
        let gen = generator();
        assert_eq!(gen.cdn_url("/img/a.png"), "https://cdn.example/img/a.png");
        assert_eq!(gen.cdn_url("//other/a.png"), "//other/a.png");
        assert_eq!(gen.cdn_url("http://x/a.png"), "http://x/a.png");
        assert_eq!(gen.lib_url("/embedded.js"), "//lib.example/embedded.js");
    }
}
