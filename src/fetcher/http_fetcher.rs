//! 基于 reqwest 的页面抓取器
//! 墙钟超时通过 tokio 计时器与请求竞速实现，超时即丢弃进行中的请求

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::debug;

use super::{normalize_url, FetchError, FetchedPage, PageFetcher};
use crate::config::ScanConfig;
use crate::error::ScoutResult;
use crate::utils::BrowserHeaders;

/// HTTP页面抓取器
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// 创建抓取器
    pub fn new(config: &ScanConfig) -> ScoutResult<Self> {
        let client = Client::builder()
            .default_headers(BrowserHeaders::build(&config.user_agent))
            .redirect(Policy::limited(config.max_redirects))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            client,
            timeout: config.fetch_timeout,
        })
    }

    /// 发起单次请求并读取完整响应体
    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().clone();
        let body = response.text().await?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let target = normalize_url(url);
        match tokio::time::timeout(self.timeout, self.fetch_once(&target)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("抓取超时：{}，时限{:?}", target, self.timeout);
                Err(FetchError::Timeout)
            }
        }
    }
}
