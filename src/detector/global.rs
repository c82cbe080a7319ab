//! 全局单例管理：内置签名库与全局扫描器
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

use super::scanner::Scanner;
use crate::compiler::{CatalogCompiler, SignatureCatalog};
use crate::config::{ConfigManager, ScanConfig};
use crate::error::{ScoutError, ScoutResult};
use crate::rule::{BatchResponse, CatalogLoader, ScanMode};

/// 内置签名库（进程内只编译一次，只读共享）
static BUILTIN_CATALOG: Lazy<Arc<SignatureCatalog>> = Lazy::new(|| {
    let entries = CatalogLoader::builtin()
        .unwrap_or_else(|e| panic!("内置签名库解析失败，签名数据已损坏：{}", e));
    let catalog = CatalogCompiler::compile(&entries)
        .unwrap_or_else(|e| panic!("内置签名库编译失败：{}", e));
    debug!("内置签名库加载完成，共{}个签名", catalog.len());
    Arc::new(catalog)
});

/// 全局扫描器实例
static GLOBAL_SCANNER: Lazy<OnceCell<Scanner>> = Lazy::new(OnceCell::new);

/// 获取内置签名库
pub fn builtin_catalog() -> Arc<SignatureCatalog> {
    Arc::clone(&BUILTIN_CATALOG)
}

/// 初始化全局扫描器（默认配置）
pub async fn init_scanner() -> ScoutResult<()> {
    init_scanner_with_config(ConfigManager::get_default()).await
}

/// 带自定义配置初始化全局扫描器，已初始化时保持原实例
pub async fn init_scanner_with_config(config: ScanConfig) -> ScoutResult<()> {
    GLOBAL_SCANNER
        .get_or_try_init(|| Scanner::new(config))
        .await?;
    Ok(())
}

/// 获取全局扫描器
pub fn get_global_scanner() -> ScoutResult<&'static Scanner> {
    GLOBAL_SCANNER.get().ok_or(ScoutError::DetectorNotInitialized)
}

/// 使用全局扫描器执行批量扫描
pub async fn scan_batch(urls: &[String], mode: ScanMode) -> ScoutResult<BatchResponse> {
    let scanner = get_global_scanner()?;
    Ok(scanner.run_batch(urls, mode).await)
}
