//! privacy-scout - 网站隐私基础设施扫描工具
//! 识别页面使用的同意管理平台、标签管理器、第三方追踪、建站平台与合规服务

// 导出全局错误类型
pub use self::error::{ScoutError, ScoutResult};

// 导出配置模块
pub use self::config::{ScanConfig, ConfigManager, CustomConfigBuilder};

// 导出签名模块核心接口
pub use self::rule::{
    Category, ScanMode, SignatureEntry, CatalogFile, CatalogLoader,
    ScanResult, ScanStatus, CategoryMatches, BatchResponse
};

// 导出编译模块核心接口
pub use self::compiler::{CatalogCompiler, SignatureCatalog, CompiledSignature, Matcher};

// 导出提取模块核心接口
pub use self::extractor::{HtmlExtractor, ParsedDocument};

// 导出抓取模块核心接口
pub use self::fetcher::{PageFetcher, HttpFetcher, FetchError, FetchedPage, normalize_url};

// 导出检测模块核心接口
pub use self::detector::{
    Scanner,
    classify,
    extract_third_party_hosts,
    builtin_catalog,
    init_scanner,
    init_scanner_with_config,
    scan_batch,
};

// 导出边界层与报告接口
pub use self::api::{ApiResponse, ScanRequest, handle_scan_request, parse_request};
pub use self::report::{ScanSummary, to_csv};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod compiler;
pub mod extractor;
pub mod fetcher;
pub mod utils;
pub mod detector;
pub mod api;
pub mod report;
