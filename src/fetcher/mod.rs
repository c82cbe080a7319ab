//! 抓取模块：单次请求、超时取消、失败分类
pub mod http_fetcher;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use self::http_fetcher::HttpFetcher;

/// 抓取失败（按URL就地恢复为不可扫描结果，不向上传播）
///
/// Display 文本即结果中的 `error` 字段。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// 目标返回非2xx
    #[error("HTTP {0}")]
    HttpStatus(u16),
    /// 超过抓取时限
    #[error("Timeout")]
    Timeout,
    /// DNS/TLS/连接/URL非法等
    #[error("{0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = err.status() {
            return FetchError::HttpStatus(status.as_u16());
        }
        FetchError::Network(error_chain(&err))
    }
}

/// 拼接错误链，reqwest 顶层信息通常不含根因
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// 抓取成功的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// 重定向后的最终地址
    pub final_url: Url,
    pub status: u16,
    pub body: String,
}

/// 页面抓取接口
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取单个URL，每次调用恰好一个结果，不重试
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// 补全协议：不以 http:// 或 https:// 开头时补 https://，其余原样返回
pub fn normalize_url(url: &str) -> String {
    let lowered = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
