// src/api/request_builder.rs

use axum::http::{HeaderMap, Method, Uri};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ConfigManager;
use crate::model::{BidRequest, HttpContext, Impression, Zone};

/// 动态请求允许的最大展示位数量
pub const MAX_IMPRESSIONS: usize = 10;

const ROBOT_MARKERS: [&str; 8] = [
    "bot",
    "crawler",
    "spider",
    "slurp",
    "headless",
    "python-requests",
    "facebookexternalhit",
    "preview",
];

/// 根据 User-Agent 判断是否为自动化流量，空 UA 视为机器人
pub fn is_robot(user_agent: Option<&str>) -> bool {
    match user_agent.map(str::trim) {
        None | Some("") => true,
        Some(ua) => {
            let ua = ua.to_ascii_lowercase();
            ROBOT_MARKERS.iter().any(|marker| ua.contains(marker))
        }
    }
}

fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    forwarded
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .unwrap_or_default()
        .to_string()
}

/// 提取 HTTP 上下文快照
pub fn http_context(method: &Method, uri: &Uri, headers: &HeaderMap, params: BTreeMap<String, String>) -> HttpContext {
    HttpContext {
        method: method.as_str().to_string(),
        uri: uri.to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        params,
        headers: headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect(),
        ip: client_ip(headers),
    }
}

fn flag(http: &HttpContext, key: &str) -> bool {
    matches!(http.query_param(key), Some("1") | Some("true"))
}

/// `count` 参数，范围 1..=MAX_IMPRESSIONS
fn impression_count(http: &HttpContext) -> usize {
    http.query_param("count")
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_IMPRESSIONS)
}

/// 构造竞价请求；只有 dynamic 协议支持多个展示位
pub fn build_request(config: &ConfigManager, codename: &str, zone: Option<Arc<Zone>>, http: HttpContext) -> BidRequest {
    let server = config.server();
    let count = if codename == "dynamic" { impression_count(&http) } else { 1 };
    let impressions = (0..count)
        .map(|_| Impression::new(&Uuid::new_v4().to_string(), zone.clone()))
        .collect();

    BidRequest {
        id: Uuid::new_v4().to_string(),
        auction_id: Uuid::new_v4().to_string(),
        debug: server.allow_debug && flag(&http, "debug"),
        robot: is_robot(http.header("user-agent")),
        impressions,
        formats: config.formats().to_vec(),
        service_domain: server.service_domain.clone(),
        http,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::http::HeaderValue;

    fn config(allow_debug: bool) -> ConfigManager {
        ConfigManager::new(ServerConfig {
            allow_debug,
            service_domain: "ads.example.com".into(),
            ..Default::default()
        })
    }

    fn http(query: &[(&str, &str)], ua: Option<&str>) -> HttpContext {
        let mut headers = HeaderMap::new();
        if let Some(ua) = ua {
            headers.insert("user-agent", HeaderValue::from_str(ua).unwrap());
        }
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        let params = query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        http_context(&Method::GET, &"/b/dynamic/1?x=1".parse().unwrap(), &headers, params)
    }

    #[test]
    fn robot_detection() {
        assert!(is_robot(None));
        assert!(is_robot(Some("  ")));
        assert!(is_robot(Some("Mozilla/5.0 (compatible; Googlebot/2.1)")));
        assert!(!is_robot(Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Firefox/128.0")));
    }

    #[test]
    fn http_context_captures_request() {
        let ctx = http(&[("format", "jsonp")], Some("Mozilla/5.0"));
        assert_eq!(ctx.method, "GET");
        assert_eq!(ctx.query, "x=1");
        assert_eq!(ctx.ip, "203.0.113.7");
        assert_eq!(ctx.query_param("format"), Some("jsonp"));
        assert_eq!(ctx.header("user-agent"), Some("Mozilla/5.0"));
    }

    #[test]
    fn dynamic_count_is_clamped() {
        let zone = Some(Arc::new(Zone::default()));
        let req = build_request(&config(false), "dynamic", zone.clone(), http(&[("count", "50")], Some("Mozilla/5.0")));
        assert_eq!(req.impressions.len(), MAX_IMPRESSIONS);

        let req = build_request(&config(false), "direct", zone, http(&[("count", "3")], Some("Mozilla/5.0")));
        assert_eq!(req.impressions.len(), 1);
        assert_ne!(req.id, req.auction_id);
        assert_eq!(req.service_domain, "ads.example.com");
    }

    #[test]
    fn debug_requires_config_permission() {
        let params = [("debug", "1")];
        assert!(!build_request(&config(false), "direct", None, http(&params, Some("Mozilla/5.0"))).debug);
        assert!(build_request(&config(true), "direct", None, http(&params, Some("Mozilla/5.0"))).debug);
        assert!(build_request(&config(true), "direct", None, http(&[], None)).robot);
    }
}
