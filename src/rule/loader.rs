//! 签名库加载管理器
//! 负责加载内置签名库与可选的追加签名文件

use std::path::Path;
use tracing::debug;

use super::model::{CatalogFile, SignatureEntry};
use crate::config::ScanConfig;
use crate::error::{ScoutError, ScoutResult};

/// 当前支持的签名库文件版本
pub const CATALOG_VERSION: u32 = 1;

/// 内置签名库（编译期嵌入）
pub static BUILTIN_SIGNATURES: &str = include_str!("../../data/signatures.json");

/// 签名库加载管理器
pub struct CatalogLoader;

impl CatalogLoader {
    /// 加载签名库（内置签名在前，追加文件在后）
    pub async fn load(config: &ScanConfig) -> ScoutResult<Vec<SignatureEntry>> {
        let mut entries = Self::builtin()?;

        if let Some(path) = &config.extra_catalog_path {
            let extra = Self::load_file(path).await?;
            debug!("追加签名文件加载成功：{}，条目数：{}", path.display(), extra.len());
            entries.extend(extra);
        }

        Ok(entries)
    }

    /// 解析内置签名库
    pub fn builtin() -> ScoutResult<Vec<SignatureEntry>> {
        Self::parse(BUILTIN_SIGNATURES)
    }

    /// 从本地JSON文件加载签名
    pub async fn load_file(path: &Path) -> ScoutResult<Vec<SignatureEntry>> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// 解析签名库JSON
    pub fn parse(json: &str) -> ScoutResult<Vec<SignatureEntry>> {
        let file: CatalogFile = serde_json::from_str(json)?;
        if file.version != CATALOG_VERSION {
            return Err(ScoutError::CatalogError(format!(
                "不支持的签名库版本：{}（当前支持 {}）",
                file.version, CATALOG_VERSION
            )));
        }
        Ok(file.signatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::rule::model::Category;

    #[test]
    fn test_builtin_catalog_parses() {
        let entries = CatalogLoader::builtin().unwrap();
        assert!(!entries.is_empty());
        for category in Category::ALL {
            assert!(
                entries.iter().any(|e| e.category == category),
                "分类 {} 无内置签名",
                category
            );
        }
        let onetrust = entries.iter().find(|e| e.name == "OneTrust").unwrap();
        assert_eq!(onetrust.category, Category::Cmp);
        assert!(onetrust.scan_raw_content);
        assert!(onetrust.script_patterns.contains(&"cdn.cookielaw.org".to_string()));
    }

    #[test]
    fn test_reject_unknown_version() {
        let err = CatalogLoader::parse(r#"{"version":2,"signatures":[]}"#).unwrap_err();
        assert!(matches!(err, ScoutError::CatalogError(_)));
    }

    #[test]
    fn test_reject_unknown_category() {
        let err = CatalogLoader::parse(r#"{"signatures":[{"name":"X","category":"cookies"}]}"#).unwrap_err();
        assert!(matches!(err, ScoutError::JsonError(_)));
    }

    #[tokio::test]
    async fn test_load_appends_extra_file() {
        let path = std::env::temp_dir().join(format!("privacy-scout-extra-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"{"version":1,"signatures":[{"name":"Acme Consent","category":"cmp","scriptPatterns":["cdn.acme-consent.test"]}]}"#,
        )
        .await
        .unwrap();

        let config = ConfigManager::custom().extra_catalog_path(path.clone()).build();
        let entries = CatalogLoader::load(&config).await.unwrap();
        let builtin_len = CatalogLoader::builtin().unwrap().len();

        assert_eq!(entries.len(), builtin_len + 1);
        assert_eq!(entries.last().unwrap().name, "Acme Consent");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let config = ConfigManager::custom()
            .extra_catalog_path(std::env::temp_dir().join("privacy-scout-does-not-exist.json"))
            .build();
        let err = CatalogLoader::load(&config).await.unwrap_err();
        assert!(matches!(err, ScoutError::IoError(_)));
    }
}
