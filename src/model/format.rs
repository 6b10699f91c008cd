// src/model/format.rs

use serde::{Deserialize, Serialize};

/// 广告格式类型
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    #[default]
    Undefined,
    Direct,
    Proxy,
    Banner,
    Native,
    Video,
}

impl FormatType {
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Undefined => "undefined",
            FormatType::Direct => "direct",
            FormatType::Proxy => "proxy",
            FormatType::Banner => "banner",
            FormatType::Native => "native",
            FormatType::Video => "video",
        }
    }
}

/// 广告格式描述，由配置加载
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub codename: String,
    #[serde(rename = "type", default)]
    pub kind: FormatType,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i32,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

impl Format {
    pub fn new(codename: &str, kind: FormatType) -> Self {
        Self {
            codename: codename.to_string(),
            kind,
            width: 0,
            height: 0,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.kind == FormatType::Direct
    }

    /// proxy 创意自行渲染并处理点击
    pub fn is_proxy(&self) -> bool {
        self.kind == FormatType::Proxy
    }
}
