//! 请求头构建工具
//! 生成桌面浏览器风格的请求头，降低被反爬拦截导致的漏报

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use tracing::warn;

use crate::config::DEFAULT_USER_AGENT;

/// 浏览器请求头构建工具
pub struct BrowserHeaders;

impl BrowserHeaders {
    /// 构建默认请求头（Accept-Encoding 由客户端根据已启用的解压特性自动协商）
    pub fn build(user_agent: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let ua = HeaderValue::from_str(user_agent).unwrap_or_else(|e| {
            warn!("UA包含非法字符：{}，回退默认UA", e);
            HeaderValue::from_static(DEFAULT_USER_AGENT)
        });
        headers.insert(USER_AGENT, ua);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("document"));
        headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("navigate"));
        headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("none"));
        headers.insert(HeaderName::from_static("sec-fetch-user"), HeaderValue::from_static("?1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        headers
    }
}
