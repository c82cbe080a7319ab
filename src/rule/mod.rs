//! 签名模块：负责签名库的加载、数据模型与扫描结果定义
pub mod model;
pub mod result;
pub mod loader;

// 导出核心接口
pub use self::model::{Category, CatalogFile, ScanMode, SignatureEntry};
pub use self::result::{BatchResponse, CategoryMatches, ScanResult, ScanStatus};
pub use self::loader::{CatalogLoader, BUILTIN_SIGNATURES, CATALOG_VERSION};
