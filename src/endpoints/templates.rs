// src/endpoints/templates.rs

const HEADER: &str = r#"<!DOCTYPE html><html><head><meta charset="UTF-8"><meta name="viewport" content="width=device-width,initial-scale=1"><style>html,body{margin:0;padding:0;overflow:hidden;background:transparent}#loadingBlock{position:absolute;top:50%;left:50%;width:24px;height:24px;margin:-12px 0 0 -12px;border:3px solid #ccc;border-top-color:#666;border-radius:50%;animation:spin 1s linear infinite}@keyframes spin{to{transform:rotate(360deg)}}</style></head><body><div id="loadingBlock"></div>"#;
const FOOTER: &str = "</body></html>";

/// 渲染 proxy 横幅：占位元素 + 加载脚本 + EmbeddedAd 初始化
///
/// debug 模式下显式传入 JSONP 地址，便于联调。
pub fn ad_render_dynamic_proxy_banner(target_id: u64, debug: bool, service_domain: &str, script_url: &str) -> String {
    let mut html = String::with_capacity(HEADER.len() + 1024);
    html.push_str(HEADER);
    html.push_str(&format!(
        r#"<ins id="element_{id}"></ins><script type="text/javascript" src="{script}"></script><script type="text/javascript">!(function(){{(new EmbeddedAd({{"#,
        id = target_id,
        script = script_url,
    ));
    if debug {
        html.push_str(&format!("JSONPLink: '//{}/b/dynamic/{{<id>}}?format=jsonp&',", service_domain));
    }
    html.push_str(&format!(
        r#"element: "element_{id}",zone_id:{id}}})).on('render', function() {{var loader = window.document.getElementById('loadingBlock');if (loader) {{loader.parentElement.removeChild(loader);}}}}).on('error', function(err) {{console.log(err);}}).render();}})();</script>"#,
        id = target_id,
    ));
    html.push_str(FOOTER);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_target_and_loader() {
        let html = ad_render_dynamic_proxy_banner(17, false, "ads.example.com", "//lib/embedded.js");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<ins id="element_17"></ins>"#));
        assert!(html.contains(r#"src="//lib/embedded.js""#));
        assert!(html.contains(r#"element: "element_17",zone_id:17})"#));
        assert!(!html.contains("JSONPLink"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn debug_adds_jsonp_link() {
        let html = ad_render_dynamic_proxy_banner(3, true, "ads.example.com", "/embedded.js");
        assert!(html.contains("JSONPLink: '//ads.example.com/b/dynamic/{<id>}?format=jsonp&',"));
    }
}
