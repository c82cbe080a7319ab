//! 扫描器核心：抓取 -> 解析 -> 分类 -> 汇总
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::analyzer::classify;
use super::global::builtin_catalog;
use super::hosts::extract_third_party_hosts;
use crate::compiler::{CatalogCompiler, SignatureCatalog};
use crate::config::ScanConfig;
use crate::error::ScoutResult;
use crate::extractor::HtmlExtractor;
use crate::fetcher::{normalize_url, FetchedPage, HttpFetcher, PageFetcher};
use crate::rule::{BatchResponse, CatalogLoader, ScanMode, ScanResult};

/// 隐私基础设施扫描器
#[derive(Clone)]
pub struct Scanner {
    catalog: Arc<SignatureCatalog>,
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<ScanConfig>,
}

impl Scanner {
    /// 创建扫描器
    pub async fn new(config: ScanConfig) -> ScoutResult<Self> {
        // 1. 签名库：无追加文件时复用进程内的内置签名库
        let catalog = match &config.extra_catalog_path {
            None => builtin_catalog(),
            Some(_) => {
                let entries = CatalogLoader::load(&config).await?;
                Arc::new(CatalogCompiler::compile(&entries)?)
            }
        };

        // 2. 抓取器
        let fetcher = HttpFetcher::new(&config)?;

        Ok(Self::with_parts(catalog, Arc::new(fetcher), config))
    }

    /// 使用自定义签名库与抓取器组装
    pub fn with_parts(
        catalog: Arc<SignatureCatalog>,
        fetcher: Arc<dyn PageFetcher>,
        config: ScanConfig,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            config: Arc::new(config),
        }
    }

    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// 扫描单个URL，失败就地转为不可扫描结果
    pub async fn scan_url(&self, url: &str, mode: ScanMode) -> ScanResult {
        let url = url.trim();
        let result = ScanResult::new(url, mode);

        match self.fetcher.fetch(&normalize_url(url)).await {
            Ok(page) => {
                let result = self.classify_page(result, &page, mode);
                debug!(
                    "扫描完成：{}，最终地址={}，命中{}项，第三方域名{}个",
                    url,
                    page.final_url,
                    result.matches.total(),
                    result.third_party_hosts.len()
                );
                result
            }
            Err(err) => {
                warn!("URL不可扫描：{}，原因：{}", url, err);
                result.into_not_scannable(err.to_string())
            }
        }
    }

    /// 对已获取的页面内容分类（不发起网络请求）
    pub fn classify_body(&self, url: &str, body: &str, page_url: &Url, mode: ScanMode) -> ScanResult {
        let page = FetchedPage {
            final_url: page_url.clone(),
            status: 200,
            body: body.to_string(),
        };
        self.classify_page(ScanResult::new(url.trim(), mode), &page, mode)
    }

    // 分词器不是 Send，解析与分类保持同步执行
    fn classify_page(&self, mut result: ScanResult, page: &FetchedPage, mode: ScanMode) -> ScanResult {
        let document = HtmlExtractor::parse(&page.body);
        result.matches = classify(&self.catalog, &page.body, &document, mode);
        result.third_party_hosts =
            extract_third_party_hosts(&document, &page.final_url, self.config.host_sample_limit);
        result
    }

    /// 批量扫描
    ///
    /// 只处理前 `batch_limit` 个URL，按输入顺序串行执行；空白URL跳过且不计数。
    pub async fn run_batch(&self, urls: &[String], mode: ScanMode) -> BatchResponse {
        let limit = self.config.batch_limit;
        let total_requested = urls.len();

        let mut results = Vec::with_capacity(total_requested.min(limit));
        for url in urls.iter().take(limit) {
            if url.trim().is_empty() {
                continue;
            }
            results.push(self.scan_url(url, mode).await);
        }

        let response = BatchResponse {
            processed_count: results.len(),
            total_requested,
            has_more: total_requested > limit,
            results,
        };
        info!(
            "批量扫描完成：模式={}，处理{}/{}，成功{}，剩余待处理={}",
            mode,
            response.processed_count,
            response.total_requested,
            response.results.iter().filter(|r| r.is_success()).count(),
            response.has_more
        );
        response
    }
}
