//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;
use std::time::Duration;

/// 默认抓取超时（毫秒）
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 8000;
/// 单次批量调用最多处理的URL数
pub const DEFAULT_BATCH_LIMIT: usize = 5;
/// 第三方域名采样上限
pub const DEFAULT_HOST_SAMPLE_LIMIT: usize = 10;
/// 最大重定向次数
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
/// 桌面浏览器UA，降低被反爬拦截导致的漏报
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// 扫描配置
#[derive(Debug, Clone)]
pub struct ScanConfig {
    // 单次抓取的墙钟超时
    pub fetch_timeout: Duration,
    // 单次批量调用的处理上限
    pub batch_limit: usize,
    // 第三方域名采样上限
    pub host_sample_limit: usize,
    // 最大重定向次数
    pub max_redirects: usize,
    // 请求UA
    pub user_agent: String,
    // 追加签名库文件（JSON），追加在内置签名之后
    pub extra_catalog_path: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            batch_limit: DEFAULT_BATCH_LIMIT,
            host_sample_limit: DEFAULT_HOST_SAMPLE_LIMIT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_catalog_path: None,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> ScanConfig {
        ScanConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: ScanConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    pub fn batch_limit(mut self, limit: usize) -> Self {
        // 上限为0时批量接口永远无法推进
        self.config.batch_limit = limit.max(1);
        self
    }

    pub fn host_sample_limit(mut self, limit: usize) -> Self {
        self.config.host_sample_limit = limit;
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn extra_catalog_path(mut self, path: PathBuf) -> Self {
        self.config.extra_catalog_path = Some(path);
        self
    }

    pub fn build(self) -> ScanConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert_eq!(config.fetch_timeout, Duration::from_millis(8000));
        assert_eq!(config.batch_limit, 5);
        assert_eq!(config.host_sample_limit, 10);
        assert!(config.extra_catalog_path.is_none());
    }

    #[test]
    fn test_custom_builder() {
        let config = ConfigManager::custom()
            .fetch_timeout(Duration::from_millis(250))
            .batch_limit(0)
            .host_sample_limit(3)
            .user_agent("scout-test/1.0")
            .build();

        assert_eq!(config.fetch_timeout, Duration::from_millis(250));
        assert_eq!(config.batch_limit, 1);
        assert_eq!(config.host_sample_limit, 3);
        assert_eq!(config.user_agent, "scout-test/1.0");
    }
}
